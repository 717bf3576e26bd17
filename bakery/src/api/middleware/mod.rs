//! API middleware.

pub mod auth;

pub use auth::{ORIGIN_TOKEN_HEADER, OriginTokenAuth, origin_token_auth};
