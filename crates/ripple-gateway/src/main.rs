//! ripple gateway binary.
//!
//! - WebSocket endpoint: /v1/ws?ticket=...
//! - One hub per process, shared by the transport and every producer
//! - Keep-alive ping + read deadline per connection

use std::net::SocketAddr;

use tracing_subscriber::{fmt, EnvFilter};

use ripple_core::error::{Result, RippleError};
use ripple_gateway::{app_state, config, router};

#[tokio::main]
async fn main() {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "ripple-gateway failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let path = std::env::var("RIPPLE_CONFIG").unwrap_or_else(|_| "ripple.yaml".to_string());
    let cfg = config::load_from_file(&path)?;
    let listen: SocketAddr = cfg
        .gateway
        .listen
        .parse()
        .map_err(|e| RippleError::BadRequest(format!("gateway.listen must be a valid SocketAddr: {e}")))?;

    let state = app_state::AppState::new(cfg);
    let app = router::build_router(state);

    tracing::info!(%listen, config = %path, "ripple-gateway starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| RippleError::Internal(format!("failed to bind {listen}: {e}")))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| RippleError::Internal(format!("server failed: {e}")))
}
