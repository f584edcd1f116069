use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::validate_token::ValidationData;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::invitation::models::InvitationTokenStatus;
use crate::inbound::http::router::AppState;

pub async fn update_token(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(body): Json<UpdateTokenRequest>,
) -> Result<ApiSuccess<ValidationData>, ApiError> {
    let status = InvitationTokenStatus::try_from(body.status)
        .map_err(|e| ApiError::invalid_request(e.to_string()))?;

    state
        .auth_service
        .update_invitation_token(&token, status)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::OK, ValidationData { success: true }))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateTokenRequest {
    status: i64,
}
