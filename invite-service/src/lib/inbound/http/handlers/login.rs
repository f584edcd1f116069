use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::account::models::EmailAddress;
use crate::domain::errors::AuthError;
use crate::domain::session::models::LoginCommand;
use crate::domain::session::models::Session;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<ApiSuccess<SessionData>, ApiError> {
    // A malformed email cannot belong to any account.
    let email = EmailAddress::new(body.email).map_err(|_| AuthError::InvalidCredentials)?;

    state
        .auth_service
        .login(LoginCommand::new(email, body.password))
        .await
        .map_err(ApiError::from)
        .map(|ref session| ApiSuccess::new(StatusCode::OK, session.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}

/// Both tokens of a session. Shared by every login flavor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionData {
    pub access_token: TokenData,
    pub refresh_token: TokenData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenData {
    pub token: String,
    pub created: DateTime<Utc>,
    /// Milliseconds.
    pub expiry: i64,
}

impl From<&auth::Token> for TokenData {
    fn from(token: &auth::Token) -> Self {
        Self {
            token: token.token.clone(),
            created: token.created,
            expiry: token.expiry,
        }
    }
}

impl From<&Session> for SessionData {
    fn from(session: &Session) -> Self {
        Self {
            access_token: (&session.access_token).into(),
            refresh_token: (&session.refresh_token).into(),
        }
    }
}
