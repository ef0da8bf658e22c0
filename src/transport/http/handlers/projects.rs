use crate::app::DEFAULT_INVESTMENT_SHARES;
use crate::domain::access::PresignedSigner;
use crate::domain::project::{Category, ProjectDraft, DEFAULT_TOTAL_SHARES};
use crate::domain::query::filter_projects;
use crate::transport::http::handlers::common::registry_error;
use crate::transport::http::types::{
    json_422, ApiResponse, AppState, CreateProjectRequest, InvestRequest, ProjectListQuery,
};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

#[utoipa::path(
    get,
    path = "/api/projects",
    params(ProjectListQuery),
    responses(
        (status = 200, description = "Projects, newest first", body = ApiResponse)
    )
)]
pub async fn list_projects_handler(
    State(state): State<AppState>,
    Query(query): Query<ProjectListQuery>,
) -> impl IntoResponse {
    let projects = state.service.load_projects().await;
    let filtered = filter_projects(&projects, query.search.as_deref(), query.category.as_deref());
    let data = serde_json::json!({
        "total": projects.len(),
        "projects": filtered,
    });
    (StatusCode::OK, Json(ApiResponse::ok(data)))
}

#[utoipa::path(
    get,
    path = "/api/projects/{id}",
    params(("id" = String, Path, description = "Project id")),
    responses(
        (status = 200, description = "Project record", body = ApiResponse),
        (status = 404, description = "No such project", body = ApiResponse)
    )
)]
pub async fn get_project_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.service.registry().get(&id).await {
        Ok(record) => (
            StatusCode::OK,
            Json(ApiResponse::ok(serde_json::json!(record))),
        )
            .into_response(),
        Err(e) => registry_error("Lookup failed", &e).into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/api/projects",
    request_body = CreateProjectRequest,
    responses(
        (status = 200, description = "Project created", body = ApiResponse),
        (status = 400, description = "Invalid draft", body = ApiResponse),
        (status = 401, description = "Wallet not connected", body = ApiResponse),
        (status = 403, description = "Transaction rejected by user", body = ApiResponse)
    )
)]
pub async fn create_project_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateProjectRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match payload {
        Ok(p) => p,
        Err(e) => {
            let expected = "{ address, name, description, total_shares?, category? }";
            return json_422(e, expected).into_response();
        }
    };

    let category = match request.category.as_deref() {
        None => Category::default(),
        Some(raw) => match raw.parse::<Category>() {
            Ok(c) => c,
            Err(e) => {
                return (StatusCode::BAD_REQUEST, Json(ApiResponse::err(e))).into_response();
            }
        },
    };
    let draft = ProjectDraft::new(request.name, request.description)
        .with_total_shares(request.total_shares.unwrap_or(DEFAULT_TOTAL_SHARES))
        .with_category(category);
    let signer = PresignedSigner::new(request.address, None);

    match state.service.submit_project(draft, &signer).await {
        Ok(record) => (
            StatusCode::OK,
            Json(ApiResponse::ok(serde_json::json!(record))),
        )
            .into_response(),
        Err(e) => registry_error("Submission failed", &e).into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/api/projects/{id}/invest",
    params(("id" = String, Path, description = "Project id")),
    request_body = InvestRequest,
    responses(
        (status = 200, description = "Investment recorded", body = ApiResponse),
        (status = 404, description = "No such project", body = ApiResponse),
        (status = 409, description = "Address already contributed", body = ApiResponse)
    )
)]
pub async fn invest_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<InvestRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match payload {
        Ok(p) => p,
        Err(e) => return json_422(e, "{ address, shares? }").into_response(),
    };
    let shares = request.shares.unwrap_or(DEFAULT_INVESTMENT_SHARES);
    let signer = PresignedSigner::new(request.address, None);

    match state.service.invest_in_project(&id, shares, &signer).await {
        Ok(record) => (
            StatusCode::OK,
            Json(ApiResponse::ok(serde_json::json!(record))),
        )
            .into_response(),
        Err(e) => registry_error("Investment failed", &e).into_response(),
    }
}
