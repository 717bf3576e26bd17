//! Service configuration.
//!
//! Read once at startup from environment variables (after loading `.env`
//! through `dotenvy`). Unset or unparsable values fall back to the defaults.
//!
//! | variable | default |
//! |---|---|
//! | `BAKERY_BIND_ADDRESS` | `0.0.0.0` |
//! | `HTTP_PORT` | `8080` |
//! | `BAKERY_ORIGIN_HOST` | unset |
//! | `BAKERY_ORIGIN_TOKEN` | unset (comma separated) |
//! | `BAKERY_CLIENT_TIMEOUT` | `5` seconds |
//! | `BAKERY_ENABLE_CORS` | `true` |
//! | `RUST_LOG`, then `LOG_LEVEL` | [`DEFAULT_LOG_FILTER`] |
//! | `LOG_FORMAT` | `text` |

use std::time::Duration;

use strum::{Display, EnumString};

/// Default tracing filter directive.
pub const DEFAULT_LOG_FILTER: &str = "bakery=info,manifest_filters=info,mpd=info,tower_http=info";

/// Output format of the log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address
    pub bind_address: String,
    /// Server port
    pub port: u16,
    /// Base URL manifest paths are resolved against
    pub origin_host: Option<String>,
    /// Accepted `x-bakery-origin-token` values; empty disables the check
    pub origin_tokens: Vec<String>,
    /// Timeout for origin manifest requests
    pub client_timeout: Duration,
    /// Enable CORS
    pub enable_cors: bool,
    /// Tracing filter directive
    pub log_filter: String,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8080,
            origin_host: None,
            origin_tokens: Vec::new(),
            client_timeout: Duration::from_secs(5),
            enable_cors: true,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            log_format: LogFormat::Text,
        }
    }
}

impl Config {
    /// Load config from environment variables, falling back to defaults.
    pub fn from_env_or_default() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load config through `lookup`, which maps a variable name to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(bind_address) = var("BAKERY_BIND_ADDRESS") {
            config.bind_address = bind_address.trim().to_string();
        }

        if let Some(port) = var("HTTP_PORT")
            && let Ok(parsed) = port.trim().parse::<u16>()
        {
            config.port = parsed;
        }

        config.origin_host = var("BAKERY_ORIGIN_HOST").map(|host| host.trim().to_string());

        if let Some(tokens) = var("BAKERY_ORIGIN_TOKEN") {
            config.origin_tokens = tokens
                .split(',')
                .map(str::trim)
                .filter(|token| !token.is_empty())
                .map(str::to_string)
                .collect();
        }

        if let Some(timeout) = var("BAKERY_CLIENT_TIMEOUT")
            && let Ok(secs) = timeout.trim().parse::<u64>()
        {
            config.client_timeout = Duration::from_secs(secs);
        }

        if let Some(enable_cors) = var("BAKERY_ENABLE_CORS")
            && let Ok(parsed) = enable_cors.trim().parse::<bool>()
        {
            config.enable_cors = parsed;
        }

        if let Some(filter) = var("RUST_LOG").or_else(|| var("LOG_LEVEL")) {
            config.log_filter = filter;
        }

        if let Some(format) = var("LOG_FORMAT")
            && let Ok(parsed) = format.trim().parse::<LogFormat>()
        {
            config.log_format = parsed;
        }

        config
    }
}
