use async_trait::async_trait;

use crate::domain::account::models::Account;
use crate::domain::account::models::AccountId;
use crate::domain::errors::AuthError;
use crate::domain::invitation::models::InvitationToken;
use crate::domain::invitation::models::InvitationTokenFilter;
use crate::domain::invitation::models::InvitationTokenStatus;
use crate::domain::invitation::models::Paging;
use crate::domain::session::models::LoginCommand;
use crate::domain::session::models::RegisterCommand;
use crate::domain::session::models::Session;
use crate::domain::session::models::Subject;

/// Port for the credential and invitation use cases.
///
/// Admin-only operations do not check roles themselves; the transport runs
/// [`AuthServicePort::authorize`] and [`AuthServicePort::require_admin`] first.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new account.
    ///
    /// # Returns
    /// Identifier of the created account
    ///
    /// # Errors
    /// * `EntityAlreadyExists` - Email is already registered
    /// * `DatabaseError` - Directory lookup or creation failed
    async fn register(&self, command: RegisterCommand) -> Result<AccountId, AuthError>;

    /// Log in with email and password.
    ///
    /// # Returns
    /// Session with access and refresh tokens bound to the account
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password (indistinguishable)
    /// * `DatabaseError` - Directory lookup failed
    async fn login(&self, command: LoginCommand) -> Result<Session, AuthError>;

    /// Log in by redeeming an invitation token.
    ///
    /// # Returns
    /// Session bound to a fresh guest identity
    ///
    /// # Errors
    /// * `TokenNotFound` / `TokenExpired` / `TokenAlreadyUsed` - Token not redeemable
    /// * `StoreError` - Backend failed
    async fn login_with_invitation_token(&self, token: &str) -> Result<Session, AuthError>;

    /// Generate a new pending invitation token. Admin only.
    async fn generate_invitation_token(&self) -> Result<InvitationToken, AuthError>;

    /// Check an invitation token without consuming it.
    ///
    /// # Errors
    /// * `TokenNotFound` / `TokenExpired` / `TokenAlreadyUsed` - Token not redeemable
    async fn validate_invitation_token(&self, token: &str) -> Result<(), AuthError>;

    /// List invitation tokens. Admin only.
    async fn list_invitation_tokens(
        &self,
        filter: &InvitationTokenFilter,
        paging: &Paging,
    ) -> Result<Vec<InvitationToken>, AuthError>;

    /// Force an invitation token's status. Admin only.
    ///
    /// # Errors
    /// * `TokenNotFound` - Absent or already evicted
    async fn update_invitation_token(
        &self,
        token: &str,
        status: InvitationTokenStatus,
    ) -> Result<(), AuthError>;

    /// Verify a bearer access token.
    ///
    /// # Returns
    /// Subject the token is bound to
    ///
    /// # Errors
    /// * `InvalidSignature` - Token was forged, altered or malformed
    /// * `SessionExpired` - Token expired
    /// * `Unauthorized` - Refresh token presented, or unreadable subject
    fn authorize(&self, bearer: &str) -> Result<Subject, AuthError>;

    /// Resolve the subject to an admin account.
    ///
    /// # Errors
    /// * `Forbidden` - Guest subject or non-admin account
    /// * `Unauthorized` - Account no longer exists
    async fn require_admin(&self, subject: &Subject) -> Result<Account, AuthError>;
}
