//! School proximity HTTP service.
//!
//! # Configuration
//!
//! - `PORT` - HTTP port (default: 3000)
//! - `DB_PATH` / `DB_NAME` - SQLite database file (default: school_management.db)
//! - `DB_POOL_SIZE` - Pooled connections (default: 10)
//! - `DB_BUSY_TIMEOUT_MS` - SQLite busy timeout (default: 5000)
//! - `RUST_LOG` - Log level (default: info)
//! - `LOG_FORMAT` - Log format: json (default) or text
//! - `METRICS_ENABLED` - Install the Prometheus recorder (default: true)

use std::net::SocketAddr;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};

use schoolmap_service::{router, ENDPOINTS};
use schoolmap_service_shared::{
    init_logging, init_metrics, AppState, LoggingConfig, MetricsConfig, ServiceConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let logging_config = LoggingConfig::from_env();
    init_logging(&logging_config).context("failed to initialise logging")?;

    if let Err(e) = init_metrics(&MetricsConfig::from_env()) {
        warn!(error = %e, "failed to initialize metrics, continuing without metrics");
    }

    let config = ServiceConfig::from_env().context("invalid configuration")?;
    info!(
        port = config.port,
        database = %config.store.path.display(),
        pool_size = config.store.pool_size,
        "starting school service"
    );

    let state = AppState::open(&config.store)
        .await
        .with_context(|| format!("failed to open database {}", config.store.path.display()))?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(addr = %addr, "listening");
    for (method, path) in ENDPOINTS {
        info!(method = *method, path = *path, "endpoint");
    }

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
}
