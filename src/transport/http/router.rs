use crate::app::status::{StatusKind, TransactionStatus};
use crate::domain::access::DecryptionGrant;
use crate::domain::project::{Category, Contributor, ProjectRecord};
use crate::domain::query::{ContributorEntry, RegistryStats};
use crate::transport::http::handlers::{decrypt, health, insights, projects};
use crate::transport::http::types::{
    ApiResponse, CreateProjectRequest, DecryptRequest, GrantResponse, InvestRequest,
};
use axum::routing::{get, post};
use axum::Router;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck_handler,
        projects::list_projects_handler,
        projects::get_project_handler,
        projects::create_project_handler,
        projects::invest_handler,
        decrypt::issue_grant_handler,
        decrypt::decrypt_handler,
        insights::stats_handler,
        insights::top_contributors_handler,
        insights::status_handler
    ),
    components(schemas(
        ApiResponse,
        CreateProjectRequest,
        InvestRequest,
        DecryptRequest,
        GrantResponse,
        DecryptionGrant,
        ProjectRecord,
        Contributor,
        Category,
        ContributorEntry,
        RegistryStats,
        TransactionStatus,
        StatusKind
    ))
)]
pub struct ApiDoc;

pub fn create_router(app_state: crate::transport::http::types::AppState) -> Router {
    Router::new()
        .route("/health", get(health::healthcheck_handler))
        .route(
            "/api/projects",
            get(projects::list_projects_handler).post(projects::create_project_handler),
        )
        .route("/api/projects/:id", get(projects::get_project_handler))
        .route("/api/projects/:id/invest", post(projects::invest_handler))
        .route("/api/decrypt/grant", get(decrypt::issue_grant_handler))
        .route("/api/decrypt", post(decrypt::decrypt_handler))
        .route("/api/stats", get(insights::stats_handler))
        .route("/api/contributors/top", get(insights::top_contributors_handler))
        .route("/api/status", get(insights::status_handler))
        .with_state(app_state)
}
