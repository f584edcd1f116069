use thiserror::Error;

/// Top-level error for every credential and invitation operation.
///
/// Variants are business outcomes except the infrastructure group at the end.
/// The transport boundary is the only place these become status codes.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Wrong password and unknown email both end up here.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account already exists: {0}")]
    EntityAlreadyExists(String),

    #[error("Record not found: {0}")]
    RecordNotFound(String),

    #[error("Invitation token not found")]
    TokenNotFound,

    #[error("Invitation token has expired")]
    TokenExpired,

    #[error("Invitation token has already been used")]
    TokenAlreadyUsed,

    #[error("Session token signature is invalid")]
    InvalidSignature,

    #[error("Session token has expired")]
    SessionExpired,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    // Infrastructure errors
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Store error: {0}")]
    StoreError(String),

    #[error("Operation timed out after {0}ms")]
    Timeout(u64),

    #[error("Internal error: {0}")]
    Internal(String),
}
