//! bakery library crate.
//!
//! An HTTP service that fetches HLS and DASH manifests from an origin and
//! returns them reduced to the tracks the request path asks for.

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod origin;

pub use error::{Error, Result};
