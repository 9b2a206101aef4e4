// GET handlers: metrics list, version

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::AppState;

/// GET /version: service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /metrics: recently stored records. Any failure is a 500 carrying
/// the error text; no partial list is returned.
pub(super) async fn metrics_list_handler(State(state): State<AppState>) -> Response {
    match state.repository.get_metrics_list().await {
        Ok(list) => (StatusCode::OK, Json(list)).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, operation = "get_metrics_list", "metrics request failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}
