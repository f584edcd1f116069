use async_trait::async_trait;

use crate::domain::errors::AuthError;
use crate::domain::invitation::models::InvitationToken;
use crate::domain::invitation::models::InvitationTokenFilter;
use crate::domain::invitation::models::InvitationTokenStatus;
use crate::domain::invitation::models::Paging;

/// Invitation token persistence on an expiring key-value backend.
///
/// `validate` and `consume` are deliberately separate operations: only
/// `consume` may change state, and it must do so in one atomic backend step.
#[async_trait]
pub trait InvitationTokenStore: Send + Sync + 'static {
    /// Create a pending token that expires after the store's TTL.
    ///
    /// # Returns
    /// Created record
    ///
    /// # Errors
    /// * `StoreError` - Backend failed, or no free token string was found
    async fn generate(&self) -> Result<InvitationToken, AuthError>;

    /// Check a token without changing it.
    ///
    /// # Errors
    /// * `TokenNotFound` - Absent or already evicted
    /// * `TokenExpired` - Expiry passed but the key is not evicted yet
    /// * `TokenAlreadyUsed` - Status is `Used`
    /// * `StoreError` - Backend failed
    async fn validate(&self, token: &str) -> Result<(), AuthError>;

    /// Check a token and mark it `Used` in one atomic step.
    ///
    /// Of several concurrent callers on the same token, at most one succeeds;
    /// the rest observe `TokenAlreadyUsed`.
    ///
    /// # Errors
    /// * Same as [`InvitationTokenStore::validate`]
    async fn consume(&self, token: &str) -> Result<(), AuthError>;

    /// List tokens matching the filter, one page at a time.
    ///
    /// # Returns
    /// Tokens in backend iteration order (not sorted)
    ///
    /// # Errors
    /// * `StoreError` - Backend failed
    async fn list(
        &self,
        filter: &InvitationTokenFilter,
        paging: &Paging,
    ) -> Result<Vec<InvitationToken>, AuthError>;

    /// Overwrite a token's status, keeping expiry and TTL.
    ///
    /// # Errors
    /// * `TokenNotFound` - Absent or already evicted
    /// * `StoreError` - Backend failed
    async fn update(&self, token: &str, status: InvitationTokenStatus) -> Result<(), AuthError>;
}
