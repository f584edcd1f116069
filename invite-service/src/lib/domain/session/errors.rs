use thiserror::Error;

/// Error for Subject parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SubjectError {
    #[error("Invalid token subject: {0}")]
    InvalidFormat(String),
}

/// Error for Password shape validation
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordRuleError {
    #[error("Password too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },
}
