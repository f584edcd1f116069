use async_trait::async_trait;

use crate::domain::account::models::Account;
use crate::domain::account::models::AccountCriteria;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::NewAccount;
use crate::domain::errors::AuthError;

/// Relational account lookup and creation.
#[async_trait]
pub trait AccountDirectory: Send + Sync + 'static {
    /// Retrieve an account matching the criteria.
    ///
    /// # Returns
    /// Optional account (None if no account matches)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_account(&self, criteria: &AccountCriteria) -> Result<Option<Account>, AuthError>;

    /// Persist a new account.
    ///
    /// # Returns
    /// Identifier assigned by the directory
    ///
    /// # Errors
    /// * `EntityAlreadyExists` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn create_account(&self, account: NewAccount) -> Result<AccountId, AuthError>;
}
