use anyhow::Result;
use struk_ai::{config, server, tunnel::TunnelSupervisor};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Validates a log level or a `RUST_LOG`-style directive list.
fn validate_log_level(level: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(level).map_err(|e| {
        anyhow::anyhow!(
            "Invalid log level: '{}' ({}). Use error, warn, info, debug, trace or target=level directives",
            level,
            e
        )
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (before logging setup)
    let config = match config::load().await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Environment variable overrides config
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| config.server.logs.level.clone());

    let filter = match validate_log_level(&log_level) {
        Ok(filter) => filter,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .init();

    info!("Starting struk-ai server with log level: {}", log_level);

    // Not awaited: the server does not wait for the tunnel and the tunnel
    // never stops the server.
    if config.tunnel.enabled {
        let _tunnel = TunnelSupervisor::new(config.tunnel.clone(), config.server.port).spawn();
    } else {
        info!("Public tunnel disabled");
    }

    server::run(config).await?;

    Ok(())
}
