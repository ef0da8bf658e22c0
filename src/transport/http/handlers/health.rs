use crate::transport::http::types::{ApiResponse, AppState};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy (store reachable)", body = ApiResponse),
        (status = 503, description = "Service is unhealthy (store unreachable)", body = ApiResponse)
    )
)]
pub async fn healthcheck_handler(State(state): State<AppState>) -> impl IntoResponse {
    let store = state.service.registry().store();
    let backend = store.backend_name().to_string();

    match store.is_available().await {
        Ok(true) => (
            StatusCode::OK,
            Json(ApiResponse::ok(
                serde_json::json!({ "status": "ok", "backend": backend }),
            )),
        )
            .into_response(),
        Ok(false) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiResponse {
                success: false,
                data: Some(serde_json::json!({ "status": "unhealthy", "backend": backend })),
                error: Some("Store reports it is unavailable".to_string()),
            }),
        )
            .into_response(),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiResponse {
                success: false,
                data: Some(serde_json::json!({ "status": "unhealthy", "backend": backend })),
                error: Some(format!("Store ping failed: {}", e)),
            }),
        )
            .into_response(),
    }
}
