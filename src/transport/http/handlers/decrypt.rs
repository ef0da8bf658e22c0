use crate::domain::access::PresignedSigner;
use crate::transport::http::handlers::common::registry_error;
use crate::transport::http::types::{json_422, ApiResponse, AppState, DecryptRequest, GrantResponse};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

#[utoipa::path(
    get,
    path = "/api/decrypt/grant",
    responses(
        (
            status = 200,
            description = "Fresh grant parameters and the message to sign",
            body = GrantResponse
        )
    )
)]
pub async fn issue_grant_handler(State(state): State<AppState>) -> impl IntoResponse {
    let grant = state.service.registry().issue_grant();
    let message = grant.message();
    (StatusCode::OK, Json(GrantResponse { grant, message }))
}

#[utoipa::path(
    post,
    path = "/api/decrypt",
    request_body = DecryptRequest,
    responses(
        (status = 200, description = "Decoded value", body = ApiResponse),
        (status = 401, description = "Wallet not connected or grant expired", body = ApiResponse),
        (status = 403, description = "Signature declined", body = ApiResponse)
    )
)]
pub async fn decrypt_handler(
    State(state): State<AppState>,
    payload: Result<Json<DecryptRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match payload {
        Ok(p) => p,
        Err(e) => {
            return json_422(e, "{ address, signature?, encrypted_value, grant }").into_response()
        }
    };
    let signer = PresignedSigner::new(request.address, request.signature);

    match state
        .service
        .decrypt_with_signature(&request.encrypted_value, &request.grant, &signer)
        .await
    {
        Ok(value) => (
            StatusCode::OK,
            Json(ApiResponse::ok(serde_json::json!({ "value": value }))),
        )
            .into_response(),
        Err(e) => registry_error("Decryption failed", &e).into_response(),
    }
}
