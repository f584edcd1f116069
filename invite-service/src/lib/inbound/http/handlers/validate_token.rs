use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::router::AppState;

pub async fn validate_token(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<ApiSuccess<ValidationData>, ApiError> {
    state
        .auth_service
        .validate_invitation_token(&token)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::OK, ValidationData { success: true }))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationData {
    pub success: bool,
}
