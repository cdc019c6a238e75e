use chrono::Duration;
use http::HeaderMap;

use crate::jwt::extract_bearer;
use crate::jwt::AuthError;
use crate::jwt::Clock;
use crate::jwt::SystemClock;
use crate::jwt::TokenError;
use crate::jwt::TokenService;
use crate::password::HashingError;
use crate::password::PasswordHasher;

/// Authentication coordinator combining password verification and tokens.
///
/// `authenticate` is the single gate in front of every write: it resolves the
/// caller's user id from request headers without touching storage.
pub struct Authenticator<C: Clock = SystemClock> {
    password_hasher: PasswordHasher,
    token_service: TokenService<C>,
    token_ttl: Duration,
}

/// Result of successful authentication.
#[derive(Debug)]
pub struct AuthenticationResult {
    /// Signed access token
    pub access_token: String,
}

/// Login errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    Password(#[from] HashingError),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),
}

impl Authenticator<SystemClock> {
    /// Create a new authenticator on the wall clock.
    ///
    /// # Arguments
    /// * `secret` - Secret key for token signing
    /// * `token_ttl` - Lifetime of tokens issued by `login`
    pub fn new(secret: &[u8], token_ttl: Duration) -> Self {
        Self::with_clock(secret, token_ttl, SystemClock)
    }
}

impl<C: Clock> Authenticator<C> {
    pub fn with_clock(secret: &[u8], token_ttl: Duration, clock: C) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            token_service: TokenService::with_clock(secret, clock),
            token_ttl,
        }
    }

    /// Hash a password for storage.
    pub fn hash_password(&self, password: &str) -> Result<String, HashingError> {
        self.password_hasher.hash(password)
    }

    /// Verify credentials and issue a token for `user_id`.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `user_id` - Subject of the issued token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `Password` - Stored hash is corrupt
    /// * `Token` - Token generation failed
    pub fn login(
        &self,
        password: &str,
        stored_hash: &str,
        user_id: u64,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        if !self.password_hasher.verify(password, stored_hash)? {
            return Err(AuthenticationError::InvalidCredentials);
        }

        let access_token = self.token_service.issue(user_id, self.token_ttl)?;

        Ok(AuthenticationResult { access_token })
    }

    /// Resolve the authenticated user id from request headers.
    ///
    /// Bearer extraction, then token validation, then subject parsing.
    ///
    /// # Errors
    /// * Any `AuthError` from extraction or validation
    /// * `InvalidSubject` - Subject is not a positive integer
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<u64, AuthError> {
        let token = extract_bearer(headers)?;
        let subject = self.token_service.validate(token)?;

        match subject.parse::<u64>() {
            Ok(user_id) if user_id > 0 => Ok(user_id),
            _ => Err(AuthError::InvalidSubject(subject)),
        }
    }

    /// Issue a token without password verification.
    pub fn generate_token(&self, user_id: u64) -> Result<String, TokenError> {
        self.token_service.issue(user_id, self.token_ttl)
    }

    /// Validate a raw token and return its subject.
    pub fn validate_token(&self, token: &str) -> Result<String, AuthError> {
        self.token_service.validate(token)
    }
}
