use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use bkmonitor_adapter::{
    api, logging, metrics, AdapterError, BkMonitor, HttpTransport, Result, Settings,
};

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_logger("bkmonitor_adapter")?;
    metrics::init_metrics();

    let settings = Settings::from_env()?;
    info!("Querying monitor backend at {}", settings.query_url());

    let addr = format!("0.0.0.0:{}", settings.port);
    let monitor = Arc::new(BkMonitor::new(HttpTransport::new(), settings));
    let app = api::router(monitor);

    info!("Starting adapter on {}", addr);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AdapterError::Internal(format!("Failed to bind to address: {}", e)))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| AdapterError::Internal(format!("Server error: {}", e)))?;

    Ok(())
}
