use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::account::errors::EmailError;
use crate::domain::account::models::EmailAddress;
use crate::domain::session::errors::PasswordRuleError;
use crate::domain::session::models::Password;
use crate::domain::session::models::RegisterCommand;
use crate::inbound::http::router::AppState;

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<ApiSuccess<i64>, ApiError> {
    state
        .auth_service
        .register(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|account_id| ApiSuccess::new(StatusCode::CREATED, account_id.0))
}

/// HTTP request body for registering an account (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRequest {
    email: String,
    password: String,
}

#[derive(Debug, Clone, Error)]
enum ParseRegisterRequestError {
    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),

    #[error("Invalid password: {0}")]
    Password(#[from] PasswordRuleError),
}

impl RegisterRequest {
    fn try_into_command(self) -> Result<RegisterCommand, ParseRegisterRequestError> {
        let email = EmailAddress::new(self.email)?;
        let password = Password::new(self.password)?;
        Ok(RegisterCommand::new(email, password))
    }
}

impl From<ParseRegisterRequestError> for ApiError {
    fn from(err: ParseRegisterRequestError) -> Self {
        ApiError::invalid_request(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_register_request() {
        let request = RegisterRequest {
            email: "alice@example.com".to_string(),
            password: "pass_word!".to_string(),
        };
        let command = request.try_into_command().unwrap();
        assert_eq!(command.email.as_str(), "alice@example.com");

        let bad_email = RegisterRequest {
            email: "alice".to_string(),
            password: "pass_word!".to_string(),
        };
        assert!(matches!(
            bad_email.try_into_command(),
            Err(ParseRegisterRequestError::Email(_))
        ));

        let empty_password = RegisterRequest {
            email: "alice@example.com".to_string(),
            password: String::new(),
        };
        assert!(matches!(
            empty_password.try_into_command(),
            Err(ParseRegisterRequestError::Password(_))
        ));
    }
}
