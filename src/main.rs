use anyhow::Result;
use mri_classifier::{config, server};
use tracing::info;
use tracing_subscriber::filter::LevelFilter;

/// Parses `logs.level` (or `RUST_LOG`) as a level filter.
fn check_log_level(level: &str) -> Result<LevelFilter> {
    level.parse::<LevelFilter>().map_err(|_| {
        anyhow::anyhow!(
            "Unknown log level '{}' (expected one of: off, error, warn, info, debug, trace)",
            level
        )
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    // no subscriber yet, so config problems go to stderr
    let config = match config::load().await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| config.server.logs.level.clone());

    if let Err(e) = check_log_level(&log_level) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(&log_level))?;
    tracing_subscriber::fmt().with_env_filter(filter).json().init();

    info!("Starting MRI classifier front-end with log level: {}", log_level);

    server::run(config).await?;

    Ok(())
}
