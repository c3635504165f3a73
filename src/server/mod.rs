//! HTTP relay: forwards browser chat requests to vendors so secrets stay
//! server-side.
//!
//! Routes:
//! - `POST /api/chat` streams the vendor's SSE bytes back unchanged.
//! - `GET /api/health` reports liveness.
//!
//! Every route allows cross-origin calls so a browser UI on another origin
//! can reach the relay; preflight `OPTIONS` requests are answered directly.

pub mod chat;
pub mod response;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{header, Method};
use axum::routing::{any, get};
use axum::Router;
use tokio::sync::oneshot;
use tower_http::cors::{Any, CorsLayer};

use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::provider::UpstreamGateway;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub gateway: UpstreamGateway,
}

impl AppState {
    pub fn new(config: Arc<RelayConfig>) -> Self {
        Self {
            gateway: UpstreamGateway::new(config),
        }
    }
}

/// Build the relay router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/chat", any(chat::relay_chat))
        .route("/api/health", get(chat::health))
        .layer(cors())
        .with_state(state)
}

/// Any origin; `GET`, `POST` and `OPTIONS`; `Content-Type` only.
fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

/// Handle returned by [`serve`]: the bound address and a shutdown trigger.
pub struct ServeHandle {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    join: Option<tokio::task::JoinHandle<Result<(), std::io::Error>>>,
}

impl ServeHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Trigger graceful shutdown and wait for the server task to exit.
    pub async fn shutdown(mut self) -> Result<(), RelayError> {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(join) = self.join.take() {
            join.await
                .map_err(|e| RelayError::InternalFault(e.to_string()))??;
        }
        Ok(())
    }
}

/// Bind the relay and start serving in a spawned task.
///
/// `bind` may use port 0; the actual port is on the returned handle.
pub async fn serve(config: Arc<RelayConfig>, bind: &str) -> Result<ServeHandle, RelayError> {
    let configured = config.configured_providers();
    let app = router(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(bind).await?;
    let addr = listener.local_addr()?;
    tracing::info!(%addr, providers = ?configured, "relay listening");

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let join = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
                tracing::info!("received shutdown signal");
            })
            .await
    });

    Ok(ServeHandle {
        addr,
        shutdown_tx: Some(shutdown_tx),
        join: Some(join),
    })
}
