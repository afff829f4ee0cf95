use crate::transport::http::error::ApiError;
use crate::transport::http::types::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy (DB reachable)"),
        (status = 503, description = "Service is unhealthy (DB unreachable)")
    )
)]
pub async fn healthcheck_handler(State(state): State<AppState>) -> Result<Response, ApiError> {
    match sqlx::query("SELECT 1").execute(state.store.pool()).await {
        Ok(_) => Ok(Json(serde_json::json!({ "status": "ok" })).into_response()),
        Err(e) => Ok((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({ "error": format!("DB ping failed: {}", e) })),
        )
            .into_response()),
    }
}
