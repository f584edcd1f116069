use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::invitation::models::InvitationToken;
use crate::inbound::http::router::AppState;

pub async fn generate_token(
    State(state): State<AppState>,
) -> Result<ApiSuccess<InvitationTokenData>, ApiError> {
    state
        .auth_service
        .generate_invitation_token()
        .await
        .map_err(ApiError::from)
        .map(|ref token| ApiSuccess::new(StatusCode::CREATED, token.into()))
}

/// Wire form of an invitation token: status as 0/1, expiry in epoch seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvitationTokenData {
    pub token: String,
    pub status: i64,
    pub expiry: i64,
}

impl From<&InvitationToken> for InvitationTokenData {
    fn from(token: &InvitationToken) -> Self {
        Self {
            token: token.token.clone(),
            status: token.status.as_i64(),
            expiry: token.expiry,
        }
    }
}
