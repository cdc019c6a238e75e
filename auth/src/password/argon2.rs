use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::Error as PasswordHashError;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Argon2;

use super::errors::HashingError;

/// Password hashing implementation.
///
/// Argon2id with the crate's default cost parameters and a random salt per hash.
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordHasher;

impl PasswordHasher {
    /// Create a new password hasher instance.
    pub fn new() -> Self {
        Self
    }

    /// Hash a plaintext password.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to hash
    ///
    /// # Returns
    /// PHC string format hash (algorithm, parameters, salt and digest)
    ///
    /// # Errors
    /// * `HashingFailed` - Salt generation or hashing failed
    pub fn hash(&self, password: &str) -> Result<String, HashingError> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| HashingError::HashingFailed(e.to_string()))
    }

    /// Verify a password against a stored hash.
    ///
    /// The digest comparison is constant-time inside `argon2`.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `hash` - Stored password hash in PHC string format
    ///
    /// # Returns
    /// True if password matches, false otherwise
    ///
    /// # Errors
    /// * `InvalidHash` - Stored hash cannot be parsed
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, HashingError> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| HashingError::InvalidHash(e.to_string()))?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(PasswordHashError::Password) => Ok(false),
            Err(e) => Err(HashingError::InvalidHash(e.to_string())),
        }
    }
}
