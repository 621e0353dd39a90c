//! Startup orchestration.
//!
//! # Responsibilities
//! - Start the metrics exporter when enabled
//! - Build the server (binding rules are checked here)
//! - Bind the listener and serve until shutdown
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The listener binds after the rules are built

use std::net::SocketAddr;

use tokio::net::TcpListener;

use crate::config::AppConfig;
use crate::http::{HttpServer, ServerError};
use crate::lifecycle::Shutdown;
use crate::observability::metrics;

/// Start serving with `config` until `shutdown` is triggered.
pub async fn start(config: AppConfig, shutdown: &Shutdown) -> Result<(), ServerError> {
    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        max_body_size = config.limits.max_body_size,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr = config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .map_err(|e| {
                ServerError::Metrics(format!(
                    "invalid address '{}': {}",
                    config.observability.metrics_address, e
                ))
            })?;
        metrics::init_metrics(addr).map_err(|e| ServerError::Metrics(e.to_string()))?;
    }

    let server = HttpServer::new(config)?;
    let listener = TcpListener::bind(&server.config().listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    server.run(listener, shutdown.subscribe()).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bad_metrics_address_stops_startup() {
        let mut config = AppConfig::default();
        config.listener.bind_address = "127.0.0.1:0".to_string();
        config.observability.metrics_enabled = true;
        config.observability.metrics_address = "nope".to_string();

        let shutdown = Shutdown::new();
        let result = tokio::time::timeout(
            std::time::Duration::from_secs(5),
            start(config, &shutdown),
        )
        .await
        .expect("startup should return instead of serving");

        match result {
            Err(ServerError::Metrics(msg)) => assert!(msg.contains("nope"), "{msg}"),
            other => panic!("expected metrics error, got {other:?}"),
        }
    }
}
