use std::fmt;
use std::str::FromStr;

use auth::Token;
use auth::TokenPair;
use uuid::Uuid;

use crate::domain::account::models::AccountId;
use crate::domain::account::models::EmailAddress;
use crate::domain::session::errors::PasswordRuleError;
use crate::domain::session::errors::SubjectError;

const GUEST_PREFIX: &str = "guest:";

/// Identity a session token is bound to.
///
/// Invitation-token logins have no account behind them, so they get a fresh
/// guest identity instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subject {
    Account(AccountId),
    Guest(Uuid),
}

impl Subject {
    pub fn new_guest() -> Self {
        Subject::Guest(Uuid::new_v4())
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subject::Account(id) => write!(f, "{}", id),
            Subject::Guest(id) => write!(f, "{}{}", GUEST_PREFIX, id),
        }
    }
}

impl FromStr for Subject {
    type Err = SubjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(guest) = s.strip_prefix(GUEST_PREFIX) {
            return Uuid::parse_str(guest)
                .map(Subject::Guest)
                .map_err(|_| SubjectError::InvalidFormat(s.to_string()));
        }

        AccountId::from_string(s)
            .map(Subject::Account)
            .map_err(|_| SubjectError::InvalidFormat(s.to_string()))
    }
}

/// Result of a successful login: who, plus both signed tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub subject: Subject,
    pub access_token: Token,
    pub refresh_token: Token,
}

impl Session {
    pub fn new(subject: Subject, tokens: TokenPair) -> Self {
        Self {
            subject,
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
        }
    }
}

/// Plaintext password that passed the shape rules.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    pub const MIN_LENGTH: usize = 6;

    /// # Errors
    /// * `TooShort` - Fewer than 6 characters
    pub fn new(password: String) -> Result<Self, PasswordRuleError> {
        let length = password.chars().count();
        if length < Self::MIN_LENGTH {
            return Err(PasswordRuleError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            });
        }
        Ok(Self(password))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Command to register a new account
#[derive(Debug, Clone)]
pub struct RegisterCommand {
    pub email: EmailAddress,
    pub password: Password,
}

impl RegisterCommand {
    pub fn new(email: EmailAddress, password: Password) -> Self {
        Self { email, password }
    }
}

/// Command to log in with email and password.
///
/// The password is not shape-checked here: any mismatch is just invalid credentials.
#[derive(Debug, Clone)]
pub struct LoginCommand {
    pub email: EmailAddress,
    pub password: String,
}

impl LoginCommand {
    pub fn new(email: EmailAddress, password: String) -> Self {
        Self { email, password }
    }
}
