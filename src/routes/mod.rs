// HTTP routes served on the agent's socket

mod http;

use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::repository::StatsRepository;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) repository: Arc<dyn StatsRepository>,
}

pub fn app(repository: Arc<dyn StatsRepository>) -> Router {
    let state = AppState { repository };
    Router::new()
        .route("/metrics", get(http::metrics_list_handler)) // GET /metrics
        .route("/version", get(http::version_handler)) // GET /version
        .route("/health", get(|| async { "ok" })) // GET /health
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
