use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use auth::JwtError;
use auth::PasswordHasher;
use auth::SignedTokenIssuer;

use crate::domain::account::models::Account;
use crate::domain::account::models::AccountCriteria;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::models::NewAccount;
use crate::domain::account::models::Role;
use crate::domain::account::ports::AccountDirectory;
use crate::domain::errors::AuthError;
use crate::domain::invitation::models::InvitationToken;
use crate::domain::invitation::models::InvitationTokenFilter;
use crate::domain::invitation::models::InvitationTokenStatus;
use crate::domain::invitation::models::Paging;
use crate::domain::invitation::ports::InvitationTokenStore;
use crate::domain::session::models::LoginCommand;
use crate::domain::session::models::RegisterCommand;
use crate::domain::session::models::Session;
use crate::domain::session::models::Subject;
use crate::domain::session::ports::AuthServicePort;

/// Default bound on a single directory or store call.
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(5);

/// Domain service implementation for the credential use cases.
///
/// Holds no mutable state of its own: the directory and the token store are the
/// only shared mutable resources, and every call into them is bounded by `deadline`.
pub struct AuthService<AD, IS>
where
    AD: AccountDirectory,
    IS: InvitationTokenStore,
{
    directory: Arc<AD>,
    invitations: Arc<IS>,
    issuer: Arc<SignedTokenIssuer>,
    password_hasher: PasswordHasher,
    /// Salt for the decoy hash on unknown-email logins.
    decoy_salt: String,
    admin_emails: Vec<EmailAddress>,
    deadline: Duration,
}

impl<AD, IS> AuthService<AD, IS>
where
    AD: AccountDirectory,
    IS: InvitationTokenStore,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `directory` - Account lookup and creation
    /// * `invitations` - Invitation token store
    /// * `issuer` - Session token issuer (carries the signing secret)
    /// * `deadline` - Upper bound for each directory/store call
    pub fn new(
        directory: Arc<AD>,
        invitations: Arc<IS>,
        issuer: Arc<SignedTokenIssuer>,
        deadline: Duration,
    ) -> Self {
        let password_hasher = PasswordHasher::new();
        Self {
            directory,
            invitations,
            issuer,
            decoy_salt: password_hasher.generate_salt(),
            password_hasher,
            admin_emails: Vec::new(),
            deadline,
        }
    }

    /// Emails that register as admins instead of regular accounts.
    pub fn with_admin_emails(mut self, admin_emails: Vec<EmailAddress>) -> Self {
        self.admin_emails = admin_emails;
        self
    }

    async fn bounded<T, F>(&self, operation: F) -> Result<T, AuthError>
    where
        F: Future<Output = Result<T, AuthError>> + Send,
    {
        tokio::time::timeout(self.deadline, operation)
            .await
            .map_err(|_| {
                let deadline_ms = self.deadline.as_millis() as u64;
                tracing::warn!(deadline_ms, "Backend call timed out");
                AuthError::Timeout(deadline_ms)
            })?
    }

    fn open_session(&self, subject: Subject) -> Result<Session, AuthError> {
        let tokens = self
            .issuer
            .issue_pair(&subject.to_string())
            .map_err(|e| AuthError::Internal(format!("Token generation failed: {}", e)))?;

        Ok(Session::new(subject, tokens))
    }
}

#[async_trait]
impl<AD, IS> AuthServicePort for AuthService<AD, IS>
where
    AD: AccountDirectory,
    IS: InvitationTokenStore,
{
    async fn register(&self, command: RegisterCommand) -> Result<AccountId, AuthError> {
        let criteria = AccountCriteria::ByEmail(command.email.clone());
        if self
            .bounded(self.directory.find_account(&criteria))
            .await?
            .is_some()
        {
            return Err(AuthError::EntityAlreadyExists(command.email.to_string()));
        }

        let salt = self.password_hasher.generate_salt();
        let password_hash = self
            .password_hasher
            .hash(command.password.as_str(), &salt)
            .map_err(|e| AuthError::Internal(format!("Password hashing failed: {}", e)))?;

        let role = if self.admin_emails.contains(&command.email) {
            Role::Admin
        } else {
            Role::Regular
        };

        let account_id = self
            .bounded(self.directory.create_account(NewAccount {
                email: command.email,
                password_hash,
                salt,
                role,
            }))
            .await?;

        tracing::info!(account_id = %account_id, admin = role == Role::Admin, "Account registered");
        Ok(account_id)
    }

    async fn login(&self, command: LoginCommand) -> Result<Session, AuthError> {
        let criteria = AccountCriteria::ByEmail(command.email);
        let Some(account) = self.bounded(self.directory.find_account(&criteria)).await? else {
            // Same Argon2 cost as a real verify, so response time does not reveal the miss.
            let _ = self.password_hasher.hash(&command.password, &self.decoy_salt);
            tracing::warn!("Login rejected: unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        let matches = self
            .password_hasher
            .verify(&command.password, &account.salt, &account.password_hash)
            .map_err(|e| AuthError::Internal(format!("Password verification failed: {}", e)))?;

        if !matches {
            tracing::warn!(account_id = %account.id, "Login rejected: password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        self.open_session(Subject::Account(account.id))
    }

    async fn login_with_invitation_token(&self, token: &str) -> Result<Session, AuthError> {
        self.bounded(self.invitations.consume(token))
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Invitation login rejected");
                e
            })?;

        let session = self.open_session(Subject::new_guest())?;
        tracing::info!(subject = %session.subject, "Invitation token redeemed");
        Ok(session)
    }

    async fn generate_invitation_token(&self) -> Result<InvitationToken, AuthError> {
        let token = self.bounded(self.invitations.generate()).await?;
        tracing::info!(expiry = token.expiry, "Invitation token generated");
        Ok(token)
    }

    async fn validate_invitation_token(&self, token: &str) -> Result<(), AuthError> {
        self.bounded(self.invitations.validate(token)).await
    }

    async fn list_invitation_tokens(
        &self,
        filter: &InvitationTokenFilter,
        paging: &Paging,
    ) -> Result<Vec<InvitationToken>, AuthError> {
        self.bounded(self.invitations.list(filter, paging)).await
    }

    async fn update_invitation_token(
        &self,
        token: &str,
        status: InvitationTokenStatus,
    ) -> Result<(), AuthError> {
        self.bounded(self.invitations.update(token, status)).await?;
        tracing::info!(status = status.as_i64(), "Invitation token status overridden");
        Ok(())
    }

    fn authorize(&self, bearer: &str) -> Result<Subject, AuthError> {
        let subject = self.issuer.verify_access(bearer).map_err(|e| match e {
            JwtError::InvalidSignature(_) => AuthError::InvalidSignature,
            JwtError::TokenExpired => AuthError::SessionExpired,
            JwtError::WrongKind { .. } => {
                AuthError::Unauthorized("Access token required".to_string())
            }
            JwtError::EncodingFailed(msg) => AuthError::Internal(msg),
        })?;

        subject
            .parse::<Subject>()
            .map_err(|e| AuthError::Unauthorized(e.to_string()))
    }

    async fn require_admin(&self, subject: &Subject) -> Result<Account, AuthError> {
        let account_id = match subject {
            Subject::Account(id) => *id,
            Subject::Guest(_) => {
                return Err(AuthError::Forbidden(
                    "Guest sessions cannot manage invitations".to_string(),
                ))
            }
        };

        let account = self
            .bounded(self.directory.find_account(&AccountCriteria::ById(account_id)))
            .await?
            .ok_or_else(|| AuthError::Unauthorized("Account no longer exists".to_string()))?;

        if !account.is_admin() {
            tracing::warn!(account_id = %account.id, "Admin operation refused");
            return Err(AuthError::Forbidden("Admin role required".to_string()));
        }

        Ok(account)
    }
}
