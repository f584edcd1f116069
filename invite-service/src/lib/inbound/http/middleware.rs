use axum::extract::Request;
use axum::extract::State;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::Response;

use super::handlers::ApiError;
use crate::domain::errors::AuthError;
use crate::domain::session::models::Subject;
use crate::inbound::http::router::AppState;

/// Extension type to store the authenticated subject in request extensions
#[derive(Debug, Clone)]
pub struct AuthenticatedSubject(pub Subject);

/// Middleware that verifies the bearer access token and records its subject
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token_from_header(&req)?;

    let subject = state.auth_service.authorize(token).map_err(|e| {
        tracing::warn!(error = %e, "Access token rejected");
        ApiError::from(e)
    })?;

    req.extensions_mut().insert(AuthenticatedSubject(subject));

    Ok(next.run(req).await)
}

/// Middleware that only lets admin accounts through. Runs after [`authenticate`].
pub async fn require_admin(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let AuthenticatedSubject(subject) = req
        .extensions()
        .get::<AuthenticatedSubject>()
        .cloned()
        .ok_or_else(|| AuthError::Unauthorized("No authenticated session".to_string()))?;

    let account = state.auth_service.require_admin(&subject).await?;
    tracing::debug!(account_id = %account.id, "Admin access granted");

    Ok(next.run(req).await)
}

fn extract_token_from_header(req: &Request) -> Result<&str, ApiError> {
    let unauthorized = |message: &str| ApiError::from(AuthError::Unauthorized(message.to_string()));

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| unauthorized("Missing Authorization header"))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| unauthorized("Invalid Authorization header"))?;

    auth_str.strip_prefix("Bearer ").ok_or_else(|| {
        unauthorized("Invalid Authorization header format. Expected: Bearer <token>")
    })
}
