use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::login::SessionData;
use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::router::AppState;

pub async fn login_with_invitation(
    State(state): State<AppState>,
    Json(body): Json<InvitationLoginRequest>,
) -> Result<ApiSuccess<SessionData>, ApiError> {
    if body.token.is_empty() {
        return Err(ApiError::invalid_request("Invitation token is required"));
    }

    state
        .auth_service
        .login_with_invitation_token(&body.token)
        .await
        .map_err(ApiError::from)
        .map(|ref session| ApiSuccess::new(StatusCode::OK, session.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InvitationLoginRequest {
    token: String,
}
