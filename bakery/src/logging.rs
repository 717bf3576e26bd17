//! Tracing subscriber setup.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LogFormat;
use crate::error::{Error, Result};

/// Install the global subscriber.
///
/// `filter` is an `EnvFilter` directive such as `bakery=debug,tower_http=info`.
/// Fails if the directive does not parse or a subscriber is already set.
pub fn init(filter: &str, format: LogFormat) -> Result<()> {
    let filter = EnvFilter::try_new(filter)
        .map_err(|e| Error::config(format!("invalid log filter '{filter}': {e}")))?;

    let registry = tracing_subscriber::registry().with(filter);
    let installed = match format {
        LogFormat::Text => registry.with(fmt::layer().with_ansi(true)).try_init(),
        LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
    };

    installed.map_err(|e| Error::Server(format!("Failed to set global default subscriber: {e}")))
}
