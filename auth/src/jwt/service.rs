use chrono::Duration;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::clock::Clock;
use super::clock::SystemClock;
use super::errors::AuthError;
use super::errors::TokenError;

/// Issues and validates signed, time-limited identity tokens.
///
/// Tokens are HS256 JWTs keyed by the process-wide secret. Validation checks
/// the signature and expiry only; there is no issuer, audience or not-before
/// check.
pub struct TokenService<C: Clock = SystemClock> {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    clock: C,
}

impl TokenService<SystemClock> {
    /// Create a token service on the wall clock.
    ///
    /// # Arguments
    /// * `secret` - Signing secret shared by issuance and validation
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Rotating the secret invalidates every outstanding token
    pub fn new(secret: &[u8]) -> Self {
        Self::with_clock(secret, SystemClock)
    }
}

impl<C: Clock> TokenService<C> {
    /// Create a token service reading time from `clock`.
    pub fn with_clock(secret: &[u8], clock: C) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            clock,
        }
    }

    /// Issue a token for `user_id` that expires `ttl` after now.
    ///
    /// # Arguments
    /// * `user_id` - Identifier encoded as the subject claim
    /// * `ttl` - Token lifetime, at least one second
    ///
    /// # Returns
    /// Signed JWT string
    ///
    /// # Errors
    /// * `InvalidTtl` - `ttl` is shorter than one second
    /// * `EncodingFailed` - Token signing failed
    pub fn issue(&self, user_id: u64, ttl: Duration) -> Result<String, TokenError> {
        if ttl < Duration::seconds(1) {
            return Err(TokenError::InvalidTtl);
        }

        let claims = Claims::for_user(user_id, self.clock.now(), ttl);

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))
    }

    /// Validate a token and return its subject.
    ///
    /// # Arguments
    /// * `token` - JWT string
    ///
    /// # Returns
    /// The subject claim, unparsed
    ///
    /// # Errors
    /// * `InvalidSignature` - Token was not signed with this secret
    /// * `Malformed` - Token cannot be decoded
    /// * `Expired` - Current time is at or past `exp`
    /// * `MissingSubject` - Token carries no subject
    pub fn validate(&self, token: &str) -> Result<String, AuthError> {
        let claims = self.decode(token)?;

        if claims.is_expired(self.clock.now().timestamp()) {
            return Err(AuthError::Expired);
        }

        match claims.sub {
            Some(sub) if !sub.is_empty() => Ok(sub),
            _ => Err(AuthError::MissingSubject),
        }
    }

    /// Verify the signature and decode the claim set.
    ///
    /// Expiry is left to `validate` so it is measured against `self.clock`.
    fn decode(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(self.algorithm);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.required_spec_claims.clear();

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|token_data| token_data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                _ => AuthError::Malformed(e.to_string()),
            })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::TimeZone;
    use chrono::Utc;
    use serde_json::json;

    use super::*;
    use crate::jwt::clock::FixedClock;

    const SECRET: &[u8] = b"my_secret_key_at_least_32_bytes_long!";

    fn fixed_service() -> (TokenService<Arc<FixedClock>>, Arc<FixedClock>) {
        let clock = Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap(),
        ));
        (TokenService::with_clock(SECRET, Arc::clone(&clock)), clock)
    }

    fn sign(claims: &serde_json::Value, secret: &[u8]) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret),
        )
        .expect("Failed to encode token")
    }

    #[test]
    fn test_issue_and_validate() {
        let service = TokenService::new(SECRET);

        let token = service
            .issue(7, Duration::hours(1))
            .expect("Failed to issue token");
        assert_eq!(token.split('.').count(), 3);

        let subject = service.validate(&token).expect("Failed to validate token");
        assert_eq!(subject, "7");
    }

    #[test]
    fn test_issue_is_deterministic_with_fixed_clock() {
        let (service, clock) = fixed_service();

        let first = service.issue(3, Duration::seconds(60)).unwrap();
        let second = service.issue(3, Duration::seconds(60)).unwrap();
        assert_eq!(first, second);

        let claims = service.decode(&first).unwrap();
        assert_eq!(claims.iss, "chirpy");
        assert_eq!(claims.iat, clock.now().timestamp());
        assert_eq!(claims.exp, clock.now().timestamp() + 60);
        assert_eq!(claims.sub.as_deref(), Some("3"));
    }

    #[test]
    fn test_validate_before_expiry() {
        let (service, clock) = fixed_service();
        let token = service.issue(11, Duration::seconds(30)).unwrap();

        clock.advance(Duration::seconds(29));
        assert_eq!(service.validate(&token), Ok("11".to_string()));
    }

    #[test]
    fn test_validate_expired_token() {
        let (service, clock) = fixed_service();
        let token = service.issue(11, Duration::seconds(30)).unwrap();

        clock.advance(Duration::seconds(30));
        assert_eq!(service.validate(&token), Err(AuthError::Expired));

        clock.advance(Duration::days(1));
        assert_eq!(service.validate(&token), Err(AuthError::Expired));
    }

    #[test]
    fn test_validate_with_wrong_secret() {
        let issuer = TokenService::new(b"secret1_at_least_32_bytes_long_key!");
        let validator = TokenService::new(b"secret2_at_least_32_bytes_long_key!");

        let token = issuer.issue(1, Duration::hours(1)).unwrap();
        assert_eq!(validator.validate(&token), Err(AuthError::InvalidSignature));
    }

    #[test]
    fn test_signature_checked_before_expiry() {
        let (issuer, clock) = fixed_service();
        let validator =
            TokenService::with_clock(b"another_secret_at_least_32_bytes!!", Arc::clone(&clock));

        let token = issuer.issue(1, Duration::seconds(5)).unwrap();
        clock.advance(Duration::hours(1));

        assert_eq!(validator.validate(&token), Err(AuthError::InvalidSignature));
    }

    #[test]
    fn test_validate_tampered_payload() {
        let service = TokenService::new(SECRET);
        let token = service.issue(1, Duration::hours(1)).unwrap();
        let forged = sign(
            &json!({"iss": "chirpy", "iat": 0, "exp": i64::MAX / 2, "sub": "2"}),
            b"attacker_controlled_secret_value!!",
        );

        let mut parts: Vec<&str> = token.split('.').collect();
        parts[1] = forged.split('.').nth(1).unwrap();
        let tampered = parts.join(".");

        assert_eq!(service.validate(&tampered), Err(AuthError::InvalidSignature));
    }

    #[test]
    fn test_validate_malformed_token() {
        let service = TokenService::new(SECRET);

        assert!(matches!(
            service.validate("invalid.token.here"),
            Err(AuthError::Malformed(_))
        ));
        assert!(matches!(
            service.validate("abc"),
            Err(AuthError::Malformed(_))
        ));
        assert!(matches!(service.validate(""), Err(AuthError::Malformed(_))));
    }

    #[test]
    fn test_validate_missing_subject() {
        let (service, clock) = fixed_service();
        let now = clock.now().timestamp();

        let token = sign(&json!({"iss": "chirpy", "iat": now, "exp": now + 60}), SECRET);
        assert_eq!(service.validate(&token), Err(AuthError::MissingSubject));

        let token = sign(
            &json!({"iss": "chirpy", "iat": now, "exp": now + 60, "sub": ""}),
            SECRET,
        );
        assert_eq!(service.validate(&token), Err(AuthError::MissingSubject));
    }

    #[test]
    fn test_validate_missing_expiry() {
        let service = TokenService::new(SECRET);
        let token = sign(&json!({"iss": "chirpy", "iat": 0, "sub": "1"}), SECRET);

        assert!(matches!(
            service.validate(&token),
            Err(AuthError::Malformed(_))
        ));
    }

    #[test]
    fn test_validate_rejects_other_algorithm() {
        let service = TokenService::new(SECRET);
        let token = encode(
            &Header::new(Algorithm::HS512),
            &json!({"iss": "chirpy", "iat": 0, "exp": i64::MAX / 2, "sub": "1"}),
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        assert!(service.validate(&token).is_err());
    }

    #[test]
    fn test_issue_rejects_short_ttl() {
        let service = TokenService::new(SECRET);

        assert_eq!(
            service.issue(1, Duration::zero()),
            Err(TokenError::InvalidTtl)
        );
        assert_eq!(
            service.issue(1, Duration::milliseconds(500)),
            Err(TokenError::InvalidTtl)
        );
    }
}
