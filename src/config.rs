//! Configuration module
//!
//! Settings come from a TOML file; every section is optional and falls back
//! to the defaults below.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::Currency;

/// Environment variable overriding the config file location
pub const CONFIG_PATH_ENV: &str = "STOREFRONT_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// `~/.config/storefront/config.toml`, or `./config.toml` when the platform
/// has no config directory.
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .map(|dir| dir.join("storefront").join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("config.toml"))
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseSettings,
    pub logging: LoggingConfig,
    pub wiring: WiringConfig,
    pub converter: ConverterConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub shutdown_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            shutdown_timeout_secs: 10,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: "sqlite://./storefront.db?mode=rwc".to_string(),
            max_connections: 10,
        }
    }
}

impl DatabaseSettings {
    pub fn connection_url(&self) -> String {
        self.url.clone()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive, e.g. "info" or "storefront=debug,tower_http=info"
    pub level: String,
    /// "text" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

/// How the object graph is assembled at startup
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WiringMode {
    /// Construct every dependency by hand
    #[default]
    Pure,
    /// Resolve dependencies through the container registry
    Container,
}

impl std::str::FromStr for WiringMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pure" => Ok(Self::Pure),
            "container" => Ok(Self::Container),
            other => Err(ConfigError::Invalid(format!(
                "unknown wiring mode '{}' (expected 'pure' or 'container')",
                other
            ))),
        }
    }
}

impl std::fmt::Display for WiringMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pure => write!(f, "pure"),
            Self::Container => write!(f, "container"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WiringConfig {
    pub mode: WiringMode,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConverterKind {
    /// Relabel prices without applying a rate
    #[default]
    Fake,
    /// Use the configured rate table
    FixedRate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    pub kind: ConverterKind,
    /// Currency the rates are quoted against
    pub base: String,
    /// Units of each currency bought by one unit of `base`, as decimal strings
    pub rates: BTreeMap<String, String>,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            kind: ConverterKind::Fake,
            base: "USD".to_string(),
            rates: BTreeMap::new(),
        }
    }
}

impl ConverterConfig {
    pub fn base_currency(&self) -> Result<Currency, ConfigError> {
        Currency::parse(&self.base).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Parse the rate table, rejecting malformed and non-positive entries.
    pub fn parsed_rates(&self) -> Result<Vec<(Currency, Decimal)>, ConfigError> {
        self.rates
            .iter()
            .map(|(code, raw)| {
                let currency =
                    Currency::parse(code).map_err(|e| ConfigError::Invalid(e.to_string()))?;
                let rate: Decimal = raw.trim().parse().map_err(|_| {
                    ConfigError::Invalid(format!("rate for {} is not a decimal: '{}'", code, raw))
                })?;
                if rate <= Decimal::ZERO {
                    return Err(ConfigError::Invalid(format!(
                        "rate for {} must be positive, got {}",
                        code, rate
                    )));
                }
                Ok((currency, rate))
            })
            .collect()
    }
}

impl AppConfig {
    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid("server.port must not be 0".to_string()));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must not be 0".to_string(),
            ));
        }
        match self.logging.format.to_ascii_lowercase().as_str() {
            "text" | "json" => {}
            other => {
                return Err(ConfigError::Invalid(format!(
                    "logging.format must be 'text' or 'json', got '{}'",
                    other
                )))
            }
        }
        if self.converter.kind == ConverterKind::FixedRate {
            self.converter.base_currency()?;
            self.converter.parsed_rates()?;
        }
        Ok(())
    }
}
