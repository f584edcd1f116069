use thiserror::Error;

use super::claims::TokenKind;

/// Error type for JWT operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    /// Signature mismatch, malformed token or any other tampering.
    #[error("Token signature is invalid: {0}")]
    InvalidSignature(String),

    #[error("Token is expired")]
    TokenExpired,

    #[error("Expected {expected:?} token, got {actual:?}")]
    WrongKind {
        expected: TokenKind,
        actual: TokenKind,
    },
}
