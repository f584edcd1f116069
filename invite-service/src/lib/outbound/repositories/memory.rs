use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::account::models::Account;
use crate::domain::account::models::AccountCriteria;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::NewAccount;
use crate::domain::account::ports::AccountDirectory;
use crate::domain::errors::AuthError;

/// Process-local account directory.
///
/// Assigns ids sequentially from 1 and enforces email uniqueness under a single
/// write lock, the same guarantees the `accounts` table gives.
#[derive(Debug, Default)]
pub struct InMemoryAccountDirectory {
    accounts: RwLock<BTreeMap<i64, Account>>,
}

impl InMemoryAccountDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountDirectory for InMemoryAccountDirectory {
    async fn find_account(&self, criteria: &AccountCriteria) -> Result<Option<Account>, AuthError> {
        let accounts = self.accounts.read().await;

        let found = match criteria {
            AccountCriteria::ById(id) => accounts.get(&id.0).cloned(),
            AccountCriteria::ByEmail(email) => accounts
                .values()
                .find(|account| &account.email == email)
                .cloned(),
        };

        Ok(found)
    }

    async fn create_account(&self, account: NewAccount) -> Result<AccountId, AuthError> {
        let mut accounts = self.accounts.write().await;

        if accounts.values().any(|existing| existing.email == account.email) {
            return Err(AuthError::EntityAlreadyExists(account.email.to_string()));
        }

        let id = AccountId(accounts.keys().next_back().map_or(1, |last| last + 1));
        accounts.insert(
            id.0,
            Account {
                id,
                email: account.email,
                password_hash: account.password_hash,
                salt: account.salt,
                role: account.role,
                created_at: Utc::now(),
            },
        );

        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::models::EmailAddress;
    use crate::domain::account::models::Role;

    fn new_account(email: &str) -> NewAccount {
        NewAccount {
            email: EmailAddress::new(email.to_string()).unwrap(),
            password_hash: "hash".to_string(),
            salt: "salt".to_string(),
            role: Role::Regular,
        }
    }

    #[tokio::test]
    async fn test_create_then_find() {
        let directory = InMemoryAccountDirectory::new();

        let first = directory.create_account(new_account("a@example.com")).await.unwrap();
        let second = directory.create_account(new_account("b@example.com")).await.unwrap();
        assert_eq!(first, AccountId(1));
        assert_eq!(second, AccountId(2));

        let by_id = directory
            .find_account(&AccountCriteria::ById(second))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_id.email.as_str(), "b@example.com");

        let by_email = directory
            .find_account(&AccountCriteria::ByEmail(
                EmailAddress::new("a@example.com".to_string()).unwrap(),
            ))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.id, first);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let directory = InMemoryAccountDirectory::new();

        directory.create_account(new_account("a@example.com")).await.unwrap();
        let result = directory.create_account(new_account("a@example.com")).await;

        assert!(matches!(result, Err(AuthError::EntityAlreadyExists(_))));
    }
}
