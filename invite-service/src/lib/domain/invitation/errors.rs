use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InvitationStatusError {
    #[error("Unknown invitation token status: {0} (expected 0 or 1)")]
    Unknown(i64),
}

/// Error for Paging validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PagingError {
    #[error("Page numbers start at 1")]
    ZeroPage,

    #[error("Limit out of range: maximum {max}, got {actual}")]
    LimitOutOfRange { max: u32, actual: u32 },
}
