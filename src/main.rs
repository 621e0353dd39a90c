//! Request parameter binding service.
//!
//! # Architecture Overview
//!
//! ```text
//!   Client Request
//!   ──────────────▶ listener ──▶ axum router ──▶ RequestFields ──▶ binder ──▶ handler
//!                                 (request id,     (query +          (scalar,    (log,
//!                                  trace,           form body)        map,        "ok")
//!                                  timeout)                           record)
//!   ◀────────────── "ok" | 400 text ◀───────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use param_binder::config::{load_config, validation::validate_config, AppConfig, ConfigError};
use param_binder::lifecycle::{signals, startup, Shutdown};
use param_binder::observability::logging;

#[derive(Parser)]
#[command(name = "param-binder")]
#[command(about = "Request parameter binding demo service", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

fn resolve_config(cli: &Cli) -> Result<AppConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };
    if let Some(bind) = &cli.bind {
        config.listener.bind_address = bind.clone();
        validate_config(&config).map_err(ConfigError::Validation)?;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    logging::init(&config.observability);
    tracing::info!("param-binder v{} starting", env!("CARGO_PKG_VERSION"));

    let shutdown = Shutdown::new();
    signals::trigger_on_signal(shutdown.clone());
    startup::start(config, &shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
