use crate::app::RegistryService;
use crate::domain::access::DecryptionGrant;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<RegistryService>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub data: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiResponse {
    pub fn ok(data: JsonValue) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Deserialize, Debug, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProjectListQuery {
    /// Case-insensitive match on name or description.
    pub search: Option<String>,
    /// Category name, or `All`.
    pub category: Option<String>,
}

#[derive(Deserialize, Debug, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TopContributorsQuery {
    /// Number of entries (default 5).
    pub limit: Option<usize>,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct CreateProjectRequest {
    /// Connected wallet address; becomes the project owner.
    pub address: Option<String>,
    pub name: String,
    pub description: String,
    /// Defaults to 1000.
    #[serde(default)]
    pub total_shares: Option<u64>,
    /// One of Biotech, AI, Physics, Chemistry, Mathematics, Other (default Biotech).
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct InvestRequest {
    pub address: Option<String>,
    /// Defaults to 100.
    #[serde(default)]
    pub shares: Option<u64>,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct GrantResponse {
    pub grant: DecryptionGrant,
    /// Text the wallet must sign.
    pub message: String,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct DecryptRequest {
    pub address: Option<String>,
    /// Wallet signature over the grant message. Omitted when the user declined.
    #[serde(default)]
    pub signature: Option<String>,
    pub encrypted_value: String,
    pub grant: DecryptionGrant,
}

pub fn json_422(err: JsonRejection, expected: &str) -> (StatusCode, Json<ApiResponse>) {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ApiResponse::err(format!(
            "Invalid JSON body: {} (expected: {})",
            err, expected
        ))),
    )
}
