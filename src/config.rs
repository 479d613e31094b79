//! Environment configuration and tracing setup

use crate::error::CopilotError;
use crate::Result;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const DEFAULT_FIXTURES_DIR: &str = "fixtures";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Directory holding actuals/budget/cash/fx JSON tables
    pub fixtures_dir: PathBuf,
    pub port: u16,
    /// Used when `RUST_LOG` is not set
    pub log_level: String,
}

impl AppConfig {
    /// Read configuration from the process environment, after loading `.env`
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let fixtures_dir = lookup("FPA_FIXTURES_DIR")
            .unwrap_or_else(|| DEFAULT_FIXTURES_DIR.to_string())
            .into();

        let port = match lookup("PORT").or_else(|| lookup("API_PORT")) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| CopilotError::Config(format!("Invalid port: {}", raw)))?,
            None => DEFAULT_PORT,
        };

        let log_level = lookup("FPA_LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        Ok(Self {
            fixtures_dir,
            port,
            log_level,
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            fixtures_dir: DEFAULT_FIXTURES_DIR.into(),
            port: DEFAULT_PORT,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

/// Install the global fmt subscriber. `RUST_LOG` wins over `default_level`.
pub fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    // a subscriber may already be installed
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
