use crate::app::registry_service::failure_message;
use crate::domain::error::RegistryError;
use crate::transport::http::types::ApiResponse;
use axum::http::StatusCode;
use axum::Json;

pub fn status_for(e: &RegistryError) -> StatusCode {
    match e {
        RegistryError::WalletNotConnected | RegistryError::GrantExpired => StatusCode::UNAUTHORIZED,
        RegistryError::UserRejected | RegistryError::OwnerInvestment => StatusCode::FORBIDDEN,
        RegistryError::ProjectNotFound(_) => StatusCode::NOT_FOUND,
        RegistryError::DuplicateContribution { .. } | RegistryError::IdCollision => {
            StatusCode::CONFLICT
        }
        RegistryError::InvalidDraft(_)
        | RegistryError::InvalidShares(_)
        | RegistryError::Codec(_) => StatusCode::BAD_REQUEST,
        RegistryError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        RegistryError::Store(_) | RegistryError::MalformedRecord { .. } => StatusCode::BAD_GATEWAY,
    }
}

pub fn registry_error(action: &str, e: &RegistryError) -> (StatusCode, Json<ApiResponse>) {
    (status_for(e), Json(ApiResponse::err(failure_message(action, e))))
}
