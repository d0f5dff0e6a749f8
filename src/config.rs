//! Process configuration
//!
//! Read once at startup from environment variables.

use std::env;
use std::time::Duration;

use crate::error::ConfigError;

/// Default listening host
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Default listening port
pub const DEFAULT_PORT: u16 = 3001;
/// Default round length
pub const DEFAULT_ROUND_DURATION_MS: u64 = 90_000;

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Socket address to bind, e.g. `0.0.0.0:3001`
    pub bind_addr: String,
    /// Length of one drawing round
    pub round_duration: Duration,
    /// Which browser origins may open a connection
    pub allowed_origins: OriginPolicy,
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through a variable lookup function
    ///
    /// Reads `HOST`, `PORT`, `ROUND_DURATION_MS` and `ALLOWED_ORIGINS`
    /// (falling back to `CORS_ORIGIN`).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let host = var("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match var("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::InvalidNumber {
                key: "PORT",
                value: raw,
            })?,
            None => DEFAULT_PORT,
        };

        let round_ms = match var("ROUND_DURATION_MS") {
            Some(raw) => raw.parse::<u64>().map_err(|_| ConfigError::InvalidNumber {
                key: "ROUND_DURATION_MS",
                value: raw,
            })?,
            None => DEFAULT_ROUND_DURATION_MS,
        };
        if round_ms == 0 {
            return Err(ConfigError::NotPositive {
                key: "ROUND_DURATION_MS",
            });
        }

        let origins = var("ALLOWED_ORIGINS")
            .or_else(|| var("CORS_ORIGIN"))
            .unwrap_or_default();

        Ok(Self {
            bind_addr: format!("{host}:{port}"),
            round_duration: Duration::from_millis(round_ms),
            allowed_origins: OriginPolicy::parse(&origins),
        })
    }
}

/// Allow-list of connection origins
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OriginPolicy {
    /// Accept every origin
    #[default]
    AllowAll,
    /// Accept only these exact origins
    AllowList(Vec<String>),
}

impl OriginPolicy {
    /// Parse a comma-separated origin list
    ///
    /// Entries without a scheme are taken as `https://`. An empty list or
    /// a `*` entry accepts everything.
    pub fn parse(raw: &str) -> Self {
        let origins: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(|o| {
                let lower = o.to_ascii_lowercase();
                if o == "*" || lower.starts_with("http://") || lower.starts_with("https://") {
                    o.to_string()
                } else {
                    format!("https://{o}")
                }
            })
            .collect();

        if origins.is_empty() || origins.iter().any(|o| o == "*") {
            Self::AllowAll
        } else {
            Self::AllowList(origins)
        }
    }

    /// Check a handshake's Origin header
    ///
    /// Requests without an Origin header (non-browser clients) are accepted.
    pub fn allows(&self, origin: Option<&str>) -> bool {
        match (self, origin) {
            (Self::AllowAll, _) | (_, None) => true,
            (Self::AllowList(list), Some(origin)) => list.iter().any(|o| o == origin),
        }
    }
}
