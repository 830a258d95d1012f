use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_HEALTH_PATH: &str = "/health";
pub const DEFAULT_PARSE_PATH: &str = "/parse";
pub const DEFAULT_EXPORT_PATH: &str = "/export-excel";
pub const DEFAULT_STORE_DIR: &str = "./.screening";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{key} must be a boolean (true/false), got {value:?}")]
    InvalidBool { key: &'static str, value: String },
    #[error("{key} is not a valid URL: {reason}")]
    InvalidUrl { key: &'static str, reason: String },
}

/// Backend endpoints and client behaviour, resolved from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Empty means paths are used as-is.
    pub base_url: String,
    pub health_path: String,
    pub parse_path: String,
    pub export_path: String,
    pub use_mock: bool,
    pub store_dir: PathBuf,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            health_path: DEFAULT_HEALTH_PATH.to_string(),
            parse_path: DEFAULT_PARSE_PATH.to_string(),
            export_path: DEFAULT_EXPORT_PATH.to_string(),
            use_mock: false,
            store_dir: PathBuf::from(DEFAULT_STORE_DIR),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl ClientConfig {
    /// Reads `SCREENING_*` variables, loading `.env` first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup; unset or blank keys keep defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let base_url = match get("SCREENING_API_BASE_URL") {
            Some(raw) => {
                let trimmed = raw.trim_end_matches('/').to_string();
                url::Url::parse(&trimmed).map_err(|err| ConfigError::InvalidUrl {
                    key: "SCREENING_API_BASE_URL",
                    reason: err.to_string(),
                })?;
                trimmed
            }
            None => String::new(),
        };
        let use_mock = match get("SCREENING_USE_MOCK") {
            Some(raw) => parse_bool("SCREENING_USE_MOCK", &raw)?,
            None => false,
        };

        Ok(Self {
            base_url,
            health_path: get("SCREENING_HEALTH_PATH").unwrap_or(defaults.health_path),
            parse_path: get("SCREENING_PARSE_PATH").unwrap_or(defaults.parse_path),
            export_path: get("SCREENING_EXPORT_PATH").unwrap_or(defaults.export_path),
            use_mock,
            store_dir: get("SCREENING_STORE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.store_dir),
            connect_timeout: defaults.connect_timeout,
        })
    }

    /// Joins the base URL and an endpoint path.
    pub fn full_url(&self, path: &str) -> String {
        if self.base_url.is_empty() {
            return path.to_string();
        }
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    pub fn health_url(&self) -> String {
        self.full_url(&self.health_path)
    }

    pub fn parse_url(&self) -> String {
        self.full_url(&self.parse_path)
    }

    pub fn export_url(&self) -> String {
        self.full_url(&self.export_path)
    }
}

fn parse_bool(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            key,
            value: raw.to_string(),
        }),
    }
}
