//! HTTP facade: one generation endpoint, a favicon and optional static hosting.
pub mod handlers;
pub mod protocol;

use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use crate::clock::{Clock, SystemClock};
use crate::config::Config;

#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Shared by every per-request client for its polling loop.
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

pub fn app(state: AppState) -> Router {
    let static_dir = state.config.static_dir.clone();

    let router = Router::new()
        .route("/api/fash-ai", post(handlers::fash_ai))
        .route("/favicon.ico", get(handlers::favicon));

    let router = if static_dir.is_dir() {
        tracing::info!(dir = %static_dir.display(), "serving static frontend");
        router.fallback_service(ServeDir::new(static_dir).append_index_html_on_directories(true))
    } else {
        router
    };

    router.layer(CorsLayer::permissive()).with_state(state)
}

/// Serves the app on an already bound listener until the process exits.
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    axum::serve(listener, app(state)).await
}
