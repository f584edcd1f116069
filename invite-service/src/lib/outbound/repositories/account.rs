use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::PgPool;

use crate::domain::account::models::Account;
use crate::domain::account::models::AccountCriteria;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::models::NewAccount;
use crate::domain::account::models::Role;
use crate::domain::account::ports::AccountDirectory;
use crate::domain::errors::AuthError;

#[derive(Debug, FromRow)]
struct AccountRow {
    id: i64,
    email: String,
    password_hash: String,
    salt: String,
    role: i16,
    created_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for Account {
    type Error = AuthError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        Ok(Account {
            id: AccountId(row.id),
            email: EmailAddress::new(row.email)
                .map_err(|e| AuthError::DatabaseError(format!("Corrupt account row: {}", e)))?,
            password_hash: row.password_hash,
            salt: row.salt,
            role: Role::try_from(row.role)
                .map_err(|e| AuthError::DatabaseError(format!("Corrupt account row: {}", e)))?,
            created_at: row.created_at,
        })
    }
}

pub struct PostgresAccountDirectory {
    pool: PgPool,
}

impl PostgresAccountDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountDirectory for PostgresAccountDirectory {
    async fn find_account(&self, criteria: &AccountCriteria) -> Result<Option<Account>, AuthError> {
        let query = match criteria {
            AccountCriteria::ByEmail(email) => sqlx::query_as::<_, AccountRow>(
                r#"
                SELECT id, email, password_hash, salt, role, created_at
                FROM accounts
                WHERE email = $1
                "#,
            )
            .bind(email.as_str().to_string()),
            AccountCriteria::ById(id) => sqlx::query_as::<_, AccountRow>(
                r#"
                SELECT id, email, password_hash, salt, role, created_at
                FROM accounts
                WHERE id = $1
                "#,
            )
            .bind(id.0),
        };

        let row = query
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        row.map(Account::try_from).transpose()
    }

    async fn create_account(&self, account: NewAccount) -> Result<AccountId, AuthError> {
        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO accounts (email, password_hash, salt, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(account.email.as_str())
        .bind(&account.password_hash)
        .bind(&account.salt)
        .bind(account.role.as_i16())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AuthError::EntityAlreadyExists(account.email.to_string());
                }
            }
            AuthError::DatabaseError(e.to_string())
        })?;

        Ok(AccountId(id))
    }
}
