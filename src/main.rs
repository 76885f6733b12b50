use anyhow::Context;
use dotenvy::dotenv;
use tokio::signal;

use rollcall::logging::{init_tracing, shutdown_tracer};
use rollcall::metrics::{init_metrics, metrics_app};
use rollcall::router::init_router;
use rollcall::state::AppState;
use rollcall_config::{CorsConfig, DatabaseConfig, ObservabilityConfig, ServerConfig};
use rollcall_db::{init_db_pool, run_migrations};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    init_tracing(&ObservabilityConfig::from_env())?;

    let db = init_db_pool(&DatabaseConfig::from_env()?).await?;
    run_migrations(&db).await?;

    let state = AppState::new(db.clone(), CorsConfig::from_env());
    let mut app = init_router(state);

    if let Some(handle) = init_metrics()? {
        app = app.merge(metrics_app(handle));
    }

    let server = ServerConfig::from_env();
    let address = server.address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;

    tracing::info!(%address, "Server running");
    tracing::info!("Swagger UI available at http://{address}/swagger-ui");
    tracing::info!("Scalar UI available at http://{address}/scalar");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    db.close().await;
    shutdown_tracer();
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => tracing::error!(error = %e, "Failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
