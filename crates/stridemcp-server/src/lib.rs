//! # STRIDE MCP Server
//!
//! HTTP front end for the threat-modeling tool catalogue: a JSON-RPC
//! endpoint on `POST /` (and `/mcp`), a capability summary on `GET`, CORS
//! and security headers on every response.
//!
//! ```rust,no_run
//! use stridemcp_server::{LoggingConfig, ServerConfig};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = ServerConfig::builder().port(9000).build();
//! LoggingConfig::default().init()?;
//! stridemcp_server::serve(&config).await?;
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![warn(missing_debug_implementations)]
#![warn(clippy::all)]

pub mod config;
pub mod http;
pub mod logging;

pub use config::{ConfigError, ConfigurationBuilder, ServerConfig};
pub use http::{ServerError, build_service, router, serve};
pub use logging::{LogOutput, LogRotation, LoggingConfig, LoggingGuard};
