use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};

use model_server::{router, AppState, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env();

    // Initialize tracing
    if config.json_logs {
        serving_core::init_tracing_json("model_server");
    } else {
        serving_core::init_tracing("model_server");
    }

    if config.metrics_enabled {
        if let Err(e) = model_server::metrics::init_metrics() {
            warn!(error = %e, "Metrics recorder not installed");
        }
    }

    // The model is loaded before the listener accepts any request
    let state = Arc::new(AppState::load(&config.resolved_model_path()));
    if !state.is_model_loaded() {
        warn!(
            path = ?state.diagnostics.model_path_tried,
            error = ?state.diagnostics.last_load_error,
            "Starting without a model; /predict will return 503"
        );
    }

    let app = router(state);

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_addr))?;

    info!(bind_addr = %config.bind_addr, "Model server starting");

    axum::serve(listener, app).await.context("server failed")?;
    Ok(())
}
