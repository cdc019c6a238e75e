//! Authentication utilities library
//!
//! Provides the credential and token lifecycle for the chirpy service:
//! - Password hashing (Argon2id)
//! - Signed, time-limited identity tokens (HS256 JWT)
//! - Bearer token extraction from request headers
//! - Request authentication (`Authenticator::authenticate`)
//!
//! The library is storage-agnostic: callers fetch user records themselves and
//! hand the stored hash and user id in.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Tokens
//! ```
//! use auth::TokenService;
//! use chrono::Duration;
//!
//! let service = TokenService::new(b"secret_key_at_least_32_bytes_long!");
//! let token = service.issue(42, Duration::hours(1)).unwrap();
//! assert_eq!(service.validate(&token).unwrap(), "42");
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::Authenticator;
//! use chrono::Duration;
//! use http::header::AUTHORIZATION;
//! use http::HeaderMap;
//!
//! let auth = Authenticator::new(b"secret_key_at_least_32_bytes_long!", Duration::hours(1));
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and issue token
//! let result = auth.login("password123", &hash, 1).unwrap();
//!
//! // Authenticated request
//! let mut headers = HeaderMap::new();
//! let value = format!("Bearer {}", result.access_token);
//! headers.insert(AUTHORIZATION, value.parse().unwrap());
//! assert_eq!(auth.authenticate(&headers).unwrap(), 1);
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use jwt::extract_bearer;
pub use jwt::AuthError;
pub use jwt::Claims;
pub use jwt::Clock;
pub use jwt::FixedClock;
pub use jwt::SystemClock;
pub use jwt::TokenError;
pub use jwt::TokenService;
pub use password::HashingError;
pub use password::PasswordHasher;
