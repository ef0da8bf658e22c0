use crate::domain::query::DEFAULT_TOP_CONTRIBUTORS;
use crate::transport::http::types::{ApiResponse, AppState, TopContributorsQuery};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

#[utoipa::path(
    get,
    path = "/api/stats",
    responses(
        (status = 200, description = "Project, contributor and share totals", body = ApiResponse)
    )
)]
pub async fn stats_handler(State(state): State<AppState>) -> impl IntoResponse {
    let stats = state.service.stats().await;
    (StatusCode::OK, Json(ApiResponse::ok(serde_json::json!(stats))))
}

#[utoipa::path(
    get,
    path = "/api/contributors/top",
    params(TopContributorsQuery),
    responses(
        (status = 200, description = "Largest allocations across all projects", body = ApiResponse)
    )
)]
pub async fn top_contributors_handler(
    State(state): State<AppState>,
    Query(query): Query<TopContributorsQuery>,
) -> impl IntoResponse {
    let limit = query.limit.unwrap_or(DEFAULT_TOP_CONTRIBUTORS);
    let top = state.service.top_contributors(limit).await;
    (StatusCode::OK, Json(ApiResponse::ok(serde_json::json!(top))))
}

#[utoipa::path(
    get,
    path = "/api/status",
    responses((status = 200, description = "Current transaction status", body = ApiResponse))
)]
pub async fn status_handler(State(state): State<AppState>) -> impl IntoResponse {
    let status = state.service.status().await;
    (StatusCode::OK, Json(ApiResponse::ok(serde_json::json!(status))))
}
