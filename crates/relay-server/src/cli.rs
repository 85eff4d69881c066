//! 命令行参数
//!
//! 命令行参数覆盖环境变量配置。位置参数 `HOST[:PORT]` 与旧的启动脚本保持一致。

use clap::Parser;
use relay_config::{Config, ConfigError, LogLevel};
use thiserror::Error;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "relay-server")]
#[command(about = "Relay LLM Gateway")]
#[command(version)]
pub struct Cli {
    /// Listen address, HOST or HOST:PORT
    pub listen: Option<String>,

    /// Bind host (overrides LLM_GATEWAY_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Bind port (overrides LLM_GATEWAY_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Enable debug mode (LLM_GATEWAY_DEBUG=true does the same)
    #[arg(long)]
    pub debug: bool,

    /// Log level: trace, debug, info, warn, error
    #[arg(long, env = "LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Model mapping file (JSON)
    #[arg(long, env = "LLM_GATEWAY_MODELS")]
    pub models: Option<String>,
}

/// 命令行错误
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid host:port format: {0}")]
    InvalidListenAddress(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Cli {
    /// 将命令行参数叠加到配置上
    pub fn apply(&self, mut config: Config) -> Result<Config, CliError> {
        if let Some(listen) = &self.listen {
            let (host, port) = parse_listen_addr(listen)?;
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
        }

        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }

        if let Some(level) = &self.log_level {
            config.logging.level = level.parse()?;
        }

        if self.debug {
            config.server.debug = true;
        }

        // debug 模式（--debug 或 LLM_GATEWAY_DEBUG）优先于日志级别
        if config.server.debug {
            config.logging.level = LogLevel::Debug;
        }

        if let Some(models) = &self.models {
            config.models_file = relay_config::expand_tilde(models);
        }

        Ok(config)
    }
}

/// 解析 `HOST`、`HOST:PORT` 或 `:PORT`
pub fn parse_listen_addr(value: &str) -> Result<(Option<String>, Option<u16>), CliError> {
    let invalid = || CliError::InvalidListenAddress(value.to_string());

    let (host, port) = match value.rsplit_once(':') {
        Some((host, port)) => {
            let port = port.parse::<u16>().map_err(|_| invalid())?;
            (host, Some(port))
        }
        None => (value, None),
    };

    if host.contains(':') {
        return Err(invalid());
    }

    let host = (!host.is_empty()).then(|| host.to_string());
    if host.is_none() && port.is_none() {
        return Err(invalid());
    }

    Ok((host, port))
}
