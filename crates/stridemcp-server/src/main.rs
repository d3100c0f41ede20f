//! `stridemcp` binary

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use stridemcp_server::{ConfigurationBuilder, ServerConfig};

/// STRIDE threat-modeling MCP server over HTTP
#[derive(Parser, Debug)]
#[command(name = "stridemcp", version, about)]
struct Cli {
    /// Configuration file (.toml, .yaml, .yml or .json)
    #[arg(long, short = 'c', env = "STRIDEMCP_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind
    #[arg(long)]
    bind: Option<String>,

    /// Port to listen on
    #[arg(long, short = 'p')]
    port: Option<u16>,

    /// Log filter, e.g. `info` or `stridemcp_core=debug`
    #[arg(long)]
    log_level: Option<String>,

    /// Emit JSON log lines
    #[arg(long)]
    json_logs: bool,
}

impl Cli {
    fn into_config(self) -> anyhow::Result<ServerConfig> {
        let loaded = ServerConfig::load(self.config.as_deref()).context("loading configuration")?;
        let mut builder = ConfigurationBuilder::from_config(loaded);
        if let Some(bind) = self.bind {
            builder = builder.bind_address(bind);
        }
        if let Some(port) = self.port {
            builder = builder.port(port);
        }
        if let Some(level) = self.log_level {
            builder = builder.log_level(level);
        }
        if self.json_logs {
            builder = builder.structured_logs(true);
        }
        Ok(builder.build())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Cli::parse().into_config()?;
    let _guard = config
        .logging
        .init()
        .context("initializing logging")?;

    stridemcp_server::serve(&config).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "stridemcp",
            "--bind",
            "127.0.0.1",
            "--port",
            "9001",
            "--log-level",
            "debug",
            "--json-logs",
        ])
        .unwrap();
        let config = cli.into_config().unwrap();
        assert_eq!(config.bind_address, "127.0.0.1");
        assert_eq!(config.port, 9001);
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.structured);
    }
}
