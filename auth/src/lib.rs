//! Credential primitives library
//!
//! Provides the building blocks the invite service composes into its use cases:
//! - Salted password hashing (Argon2id, explicit per-account salt)
//! - Session token encoding and validation (JWT, HS256)
//! - Access/refresh pair issuance
//!
//! Nothing in here touches storage. Callers own where salts, digests and
//! secrets live.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let salt = hasher.generate_salt();
//! let digest = hasher.hash("my_password", &salt).unwrap();
//! assert!(hasher.verify("my_password", &salt, &digest).unwrap());
//! ```
//!
//! ## Session Tokens
//! ```
//! use auth::{SignedTokenIssuer, TokenConfig};
//!
//! let issuer = SignedTokenIssuer::new(TokenConfig::new(
//!     "secret_key_at_least_32_bytes_long!",
//!     15 * 60,
//!     7 * 24 * 60 * 60,
//! ));
//! let pair = issuer.issue_pair("42").unwrap();
//! assert_eq!(issuer.verify(&pair.access_token.token).unwrap(), "42");
//! ```

pub mod issuer;
pub mod jwt;
pub mod password;

pub use issuer::SignedTokenIssuer;
pub use issuer::Token;
pub use issuer::TokenConfig;
pub use issuer::TokenPair;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::SessionClaims;
pub use jwt::TokenKind;
pub use password::PasswordError;
pub use password::PasswordHasher;
