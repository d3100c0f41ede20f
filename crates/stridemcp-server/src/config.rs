//! Server configuration management

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use stridemcp_core::PayloadLimits;

use crate::logging::LoggingConfig;

/// Prefix for environment overrides, e.g. `STRIDEMCP_PORT=9000`
pub const ENV_PREFIX: &str = "STRIDEMCP";

/// Default bind address
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";

/// Default port
pub const DEFAULT_PORT: u16 = 8787;

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address
    pub bind_address: String,
    /// Bind port
    pub port: u16,
    /// Payload guard limits
    pub limits: PayloadLimits,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            port: DEFAULT_PORT,
            limits: PayloadLimits::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file not found
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    /// Unsupported file format
    #[error("Unsupported configuration file format. Use .toml, .yaml, .yml, or .json")]
    UnsupportedFormat,

    /// Configuration parsing error
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] config::ConfigError),

    /// Bind address and port do not form a socket address
    #[error("Invalid bind address '{address}': {reason}")]
    InvalidAddress {
        /// The `address:port` string that failed to parse
        address: String,
        /// Parser message
        reason: String,
    },
}

impl ServerConfig {
    /// Load configuration from defaults, an optional file, then the environment.
    ///
    /// The file format is picked from the extension (`.toml`, `.yaml`/`.yml`,
    /// `.json`). Environment variables prefixed with `STRIDEMCP_` override
    /// both; nested keys use `__`, e.g. `STRIDEMCP_LIMITS__MAX_JSON_DEPTH=10`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, has an unsupported extension,
    /// or holds values that do not deserialize.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_prefix(path, ENV_PREFIX)
    }

    /// [`ServerConfig::load`] with a custom environment prefix
    pub fn load_with_prefix(path: Option<&Path>, env_prefix: &str) -> Result<Self, ConfigError> {
        use config::{Config, Environment, File, FileFormat};

        let mut builder = Config::builder();

        if let Some(path) = path {
            if !path.exists() {
                return Err(ConfigError::FileNotFound(path.to_path_buf()));
            }

            let format = match path.extension().and_then(|s| s.to_str()) {
                Some("toml") => FileFormat::Toml,
                Some("yaml" | "yml") => FileFormat::Yaml,
                Some("json") => FileFormat::Json,
                _ => return Err(ConfigError::UnsupportedFormat),
            };
            let name = path.to_str().ok_or(ConfigError::UnsupportedFormat)?;
            builder = builder.add_source(File::new(name, format));
        }

        let config = builder
            .add_source(
                Environment::with_prefix(env_prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Create a configuration builder
    ///
    /// ```rust
    /// use stridemcp_server::ServerConfig;
    ///
    /// let config = ServerConfig::builder()
    ///     .bind_address("127.0.0.1")
    ///     .port(9000)
    ///     .build();
    /// assert_eq!(config.port, 9000);
    /// ```
    pub fn builder() -> ConfigurationBuilder {
        ConfigurationBuilder::new()
    }

    /// Socket address built from `bind_address` and `port`
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let address = format!("{}:{}", self.bind_address, self.port);
        address
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::InvalidAddress {
                reason: e.to_string(),
                address,
            })
    }
}

/// Configuration builder
#[derive(Debug, Default)]
pub struct ConfigurationBuilder {
    config: ServerConfig,
}

impl ConfigurationBuilder {
    /// Start from the defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration
    #[must_use]
    pub fn from_config(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Set bind address
    #[must_use]
    pub fn bind_address(mut self, address: impl Into<String>) -> Self {
        self.config.bind_address = address.into();
        self
    }

    /// Set port
    #[must_use]
    pub const fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Set payload limits
    #[must_use]
    pub const fn limits(mut self, limits: PayloadLimits) -> Self {
        self.config.limits = limits;
        self
    }

    /// Set log level
    #[must_use]
    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    /// Toggle JSON log output
    #[must_use]
    pub fn structured_logs(mut self, structured: bool) -> Self {
        self.config.logging.structured = structured;
        self
    }

    /// Build the configuration
    #[must_use]
    pub fn build(self) -> ServerConfig {
        self.config
    }
}
