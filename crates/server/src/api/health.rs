use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;

use super::schemas::HealthResponse;

/// `GET /health` -- liveness check.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    summary = "Health check",
    description = "Returns `ok` while the process is serving requests. Does not touch the database.",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".into(),
    })
}

/// Chrome DevTools requests this path on every page load; answer with an empty
/// 404 so it does not fall through to the static files.
pub async fn devtools() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(serde_json::json!({})))
}
