use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::jwt::SessionClaims;
use crate::jwt::TokenKind;

/// Secret and lifetimes for session tokens.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    pub secret: String,
    pub access_token_expiry: Duration,
    pub refresh_token_expiry: Duration,
}

impl TokenConfig {
    pub fn new(secret: impl Into<String>, access_expiry_secs: i64, refresh_expiry_secs: i64) -> Self {
        Self {
            secret: secret.into(),
            access_token_expiry: Duration::seconds(access_expiry_secs),
            refresh_token_expiry: Duration::seconds(refresh_expiry_secs),
        }
    }
}

/// A signed token as handed to clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub token: String,
    pub created: DateTime<Utc>,
    /// Lifetime in milliseconds.
    pub expiry: i64,
}

/// Access/refresh tokens issued together for one subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: Token,
    pub refresh_token: Token,
}

/// Mints and verifies session tokens.
///
/// Both halves of a pair are signed with the same secret but neither depends on
/// the other to verify. Built once at startup and shared read-only.
pub struct SignedTokenIssuer {
    jwt_handler: JwtHandler,
    config: TokenConfig,
}

impl SignedTokenIssuer {
    pub fn new(config: TokenConfig) -> Self {
        Self {
            jwt_handler: JwtHandler::new(config.secret.as_bytes()),
            config,
        }
    }

    /// Issue an access/refresh pair bound to `subject`, issued now.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn issue_pair(&self, subject: &str) -> Result<TokenPair, JwtError> {
        self.issue_pair_at(subject, Utc::now())
    }

    /// Issue an access/refresh pair bound to `subject`, issued at `issued_at`.
    pub fn issue_pair_at(
        &self,
        subject: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<TokenPair, JwtError> {
        let access_token = self.issue(
            subject,
            TokenKind::Access,
            issued_at,
            self.config.access_token_expiry,
        )?;
        let refresh_token = self.issue(
            subject,
            TokenKind::Refresh,
            issued_at,
            self.config.refresh_token_expiry,
        )?;

        tracing::debug!(subject = %subject, "Issued session token pair");

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Verify a token of either kind.
    ///
    /// # Returns
    /// The embedded subject
    ///
    /// # Errors
    /// * `InvalidSignature` - Token was not signed with this secret or was altered
    /// * `TokenExpired` - Embedded expiry has passed
    pub fn verify(&self, token: &str) -> Result<String, JwtError> {
        self.jwt_handler.decode(token).map(|claims| claims.sub)
    }

    /// Verify a token and require it to be an access token.
    ///
    /// # Errors
    /// * `WrongKind` - A valid refresh token was presented
    /// * Everything [`SignedTokenIssuer::verify`] returns
    pub fn verify_access(&self, token: &str) -> Result<String, JwtError> {
        let claims = self.jwt_handler.decode(token)?;

        if claims.kind != TokenKind::Access {
            return Err(JwtError::WrongKind {
                expected: TokenKind::Access,
                actual: claims.kind,
            });
        }

        Ok(claims.sub)
    }

    fn issue(
        &self,
        subject: &str,
        kind: TokenKind,
        issued_at: DateTime<Utc>,
        lifetime: Duration,
    ) -> Result<Token, JwtError> {
        let claims = SessionClaims::new(subject, kind, issued_at, lifetime);
        let token = self.jwt_handler.encode(&claims)?;

        Ok(Token {
            token,
            created: issued_at,
            expiry: lifetime.num_milliseconds(),
        })
    }
}
