use clap::Parser;
use relay_config::{Config, ConfigLoader};
use relay_server::{init_logging, run_server, Cli, CliError, Gateway};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 环境变量 → 命令行覆盖
    let config = match Config::from_env()
        .map_err(CliError::from)
        .and_then(|config| cli.apply(config))
    {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    init_logging(config.logging.level.as_str());

    // 模型映射文件 + 校验
    let config = match ConfigLoader::finish(config).await {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Starting Relay gateway v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("  Models: {}", config.models.len());
    tracing::info!("  Upstream timeout: {}s", config.http.timeout_seconds);
    tracing::info!(
        "  Defaults: temperature={} max_tokens={} top_p={}",
        config.defaults.temperature,
        config.defaults.max_tokens,
        config.defaults.top_p
    );

    if config.server.debug {
        tracing::debug!("Debug mode enabled");
        for mapping in &config.models {
            tracing::debug!("  {} -> {}/{}", mapping.name, mapping.provider, mapping.model);
        }
    }

    let gateway = Gateway::from_config(&config)?;

    run_server(gateway, &config.server.host, config.server.port).await
}
