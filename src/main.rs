use clap::Parser;
use mini_weather::utils::{logger, validation::Validate};
use mini_weather::{CliConfig, LineTransport, McpServer, ToolRouter, WeatherRegistry};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    if config.logging.json {
        logger::init_json_logger(cli.verbose, config.logging.level.as_deref());
    } else {
        logger::init_cli_logger(cli.verbose, config.logging.level.as_deref());
    }

    if cli.verbose {
        tracing::debug!("Resolved config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    let registry = Arc::new(WeatherRegistry::with_seeds(config.seed_entries()));
    tracing::info!("Registry ready with {} seeded cities", registry.len());

    // stdio carries the protocol; logs stay on stderr
    let server = McpServer::new(ToolRouter::new(registry), config.server_info());
    let mut transport = LineTransport::stdio();

    server.run(&mut transport).await?;
    Ok(())
}
