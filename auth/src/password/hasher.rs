use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::SaltString;
use argon2::Argon2;

use super::errors::PasswordError;

/// Salted password hashing.
///
/// The salt is generated once per account and stored next to the digest, so the
/// same `(password, salt)` pair always yields the same PHC string (Argon2id).
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordHasher;

impl PasswordHasher {
    pub fn new() -> Self {
        Self
    }

    /// Generate a fresh per-account salt.
    ///
    /// # Returns
    /// Base64 salt string (128 random bits from the OS RNG)
    pub fn generate_salt(&self) -> String {
        SaltString::generate(&mut OsRng).as_str().to_string()
    }

    /// Hash a plaintext password under the given salt.
    ///
    /// # Arguments
    /// * `password` - Plaintext password
    /// * `salt` - Account salt produced by [`PasswordHasher::generate_salt`]
    ///
    /// # Returns
    /// PHC string format digest
    ///
    /// # Errors
    /// * `InvalidSalt` - Salt is not valid unpadded base64 of a supported length
    /// * `HashingFailed` - Argon2 rejected the input
    pub fn hash(&self, password: &str, salt: &str) -> Result<String, PasswordError> {
        let salt = Self::parse_salt(salt)?;

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Check a plaintext password against a stored digest.
    ///
    /// Recomputes the digest under `salt` and compares the raw hash outputs in
    /// constant time. A wrong password is `Ok(false)`, not an error.
    ///
    /// # Errors
    /// * `InvalidSalt` - Stored salt is unusable
    /// * `MalformedHash` - Stored digest is not a PHC string
    /// * `HashingFailed` - Argon2 rejected the input
    pub fn verify(&self, password: &str, salt: &str, stored: &str) -> Result<bool, PasswordError> {
        let stored = PasswordHash::new(stored)
            .map_err(|e| PasswordError::MalformedHash(e.to_string()))?;

        let salt = Self::parse_salt(salt)?;
        let candidate = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;

        Ok(match (candidate.hash, stored.hash) {
            (Some(candidate), Some(stored)) => candidate == stored,
            _ => false,
        })
    }

    fn parse_salt(salt: &str) -> Result<SaltString, PasswordError> {
        SaltString::from_b64(salt).map_err(|e| PasswordError::InvalidSalt(e.to_string()))
    }
}
