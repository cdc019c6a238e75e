use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Issuer stamped on every token.
pub const ISSUER: &str = "chirpy";

/// Claim set carried by an identity token.
///
/// Timestamps are Unix seconds (RFC 7519 NumericDate).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Issuer
    pub iss: String,

    /// Issued at
    pub iat: i64,

    /// Expiration time
    pub exp: i64,

    /// Subject (user identifier)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
}

impl Claims {
    /// Create claims for a user, valid from `now` for `ttl`.
    ///
    /// # Arguments
    /// * `user_id` - Identifier stored as the subject
    /// * `now` - Issuance instant
    /// * `ttl` - Lifetime of the token
    pub fn for_user(user_id: impl ToString, now: DateTime<Utc>, ttl: Duration) -> Self {
        let issued_at = now.timestamp();

        Self {
            iss: ISSUER.to_string(),
            iat: issued_at,
            exp: issued_at + ttl.num_seconds(),
            sub: Some(user_id.to_string()),
        }
    }

    /// Check if the token is expired at `current_timestamp`.
    ///
    /// A token stops being valid at the exact second of `exp`.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        current_timestamp >= self.exp
    }
}
