//! Configuration module - environment variable parsing

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::capture::DEFAULT_JPEG_QUALITY;
use crate::util::time::DEFAULT_TICK_RATE;

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Server binding address
    pub server_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Target simulation/render ticks per second
    pub tick_rate: u32,
    /// JPEG quality for captured frames (1-100)
    pub jpeg_quality: u8,

    /// Optional controller page overriding the built-in one
    pub index_html_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            log_level: "info".to_string(),
            tick_rate: DEFAULT_TICK_RATE,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            index_html_path: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        // PORT wins over SERVER_ADDR, matching common hosting conventions
        let server_addr = match (lookup("PORT"), lookup("SERVER_ADDR")) {
            (Some(port), _) => format!("0.0.0.0:{}", port)
                .parse()
                .map_err(|_| ConfigError::InvalidAddress)?,
            (None, Some(addr)) => addr.parse().map_err(|_| ConfigError::InvalidAddress)?,
            (None, None) => defaults.server_addr,
        };

        let tick_rate = match lookup("TICK_RATE") {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(rate) if rate > 0 => rate,
                _ => return Err(ConfigError::Invalid { key: "TICK_RATE", value: raw }),
            },
            None => defaults.tick_rate,
        };

        let jpeg_quality = match lookup("JPEG_QUALITY") {
            Some(raw) => match raw.trim().parse::<u8>() {
                Ok(q) if (1..=100).contains(&q) => q,
                _ => return Err(ConfigError::Invalid { key: "JPEG_QUALITY", value: raw }),
            },
            None => defaults.jpeg_quality,
        };

        Ok(Self {
            server_addr,
            log_level: lookup("LOG_LEVEL").unwrap_or(defaults.log_level),
            tick_rate,
            jpeg_quality,
            index_html_path: lookup("INDEX_HTML_PATH").map(PathBuf::from),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },

    #[error("Invalid server address format")]
    InvalidAddress,
}
