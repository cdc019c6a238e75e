use std::fmt;

use chrono::DateTime;
use chrono::Utc;

use crate::domain::chirp::errors::ChirpBodyError;
use crate::domain::chirp::errors::ChirpIdError;
use crate::domain::user::models::UserId;

/// A short text post.
#[derive(Debug, Clone, PartialEq)]
pub struct Chirp {
    pub id: ChirpId,
    pub body: ChirpBody,
    pub author_id: UserId,
    pub created_at: DateTime<Utc>,
}

/// Chirp unique identifier type, assigned by storage starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChirpId(pub u64);

impl ChirpId {
    /// Parse a chirp ID from a path segment.
    ///
    /// # Errors
    /// * `InvalidFormat` - Not a positive integer
    pub fn from_string(s: &str) -> Result<Self, ChirpIdError> {
        match s.parse::<u64>() {
            Ok(id) if id > 0 => Ok(Self(id)),
            _ => Err(ChirpIdError::InvalidFormat(s.to_string())),
        }
    }
}

impl fmt::Display for ChirpId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Chirp text, cleaned of the blocked words.
///
/// At most 140 characters before cleaning; replacements never lengthen it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChirpBody(String);

impl ChirpBody {
    pub const MAX_LENGTH: usize = 140;

    const PROFANITIES: [&'static str; 3] = ["kerfuffle", "sharbert", "fornax"];
    const REPLACEMENT: &'static str = "****";

    /// Validate and clean a raw chirp body.
    ///
    /// # Errors
    /// * `Empty` - Body is empty or only whitespace
    /// * `TooLong` - Body exceeds 140 characters
    pub fn new(body: String) -> Result<Self, ChirpBodyError> {
        if body.trim().is_empty() {
            return Err(ChirpBodyError::Empty);
        }

        let length = body.chars().count();
        if length > Self::MAX_LENGTH {
            return Err(ChirpBodyError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }

        Ok(Self(Self::clean(body)))
    }

    /// Rebuild a body that was already validated and cleaned, e.g. from storage.
    pub fn from_stored(body: String) -> Self {
        Self(body)
    }

    /// Replace each blocked word, lowercase or title-cased, with `****`.
    pub fn clean(body: String) -> String {
        Self::PROFANITIES.iter().fold(body, |body, word| {
            body.replace(word, Self::REPLACEMENT)
                .replace(&title_case(word), Self::REPLACEMENT)
        })
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Command to publish a chirp on behalf of the authenticated user.
#[derive(Debug)]
pub struct CreateChirpCommand {
    pub body: ChirpBody,
    pub author_id: UserId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_replaces_blocked_words() {
        assert_eq!(
            ChirpBody::clean("I had something interesting for breakfast".to_string()),
            "I had something interesting for breakfast"
        );
        assert_eq!(
            ChirpBody::clean("I hear Mastodon is better than Chirpy. sharbert I need to migrate".to_string()),
            "I hear Mastodon is better than Chirpy. **** I need to migrate"
        );
        assert_eq!(
            ChirpBody::clean("This is a kerfuffle opinion I need to share with the world".to_string()),
            "This is a **** opinion I need to share with the world"
        );
        assert_eq!(
            ChirpBody::clean("Fornax! and Kerfuffle".to_string()),
            "****! and ****"
        );
    }

    #[test]
    fn test_clean_is_case_limited() {
        // Only the lowercase and title-cased spellings are blocked.
        assert_eq!(ChirpBody::clean("SHARBERT".to_string()), "SHARBERT");
    }

    #[test]
    fn test_body_length_limit() {
        assert!(ChirpBody::new("a".repeat(140)).is_ok());
        assert_eq!(
            ChirpBody::new("a".repeat(141)),
            Err(ChirpBodyError::TooLong {
                max: 140,
                actual: 141
            })
        );
        // Characters, not bytes.
        assert!(ChirpBody::new("é".repeat(140)).is_ok());
    }

    #[test]
    fn test_body_empty() {
        assert_eq!(ChirpBody::new(String::new()), Err(ChirpBodyError::Empty));
        assert_eq!(ChirpBody::new("   ".to_string()), Err(ChirpBodyError::Empty));
    }

    #[test]
    fn test_chirp_id_from_string() {
        assert_eq!(ChirpId::from_string("7"), Ok(ChirpId(7)));
        assert!(ChirpId::from_string("0").is_err());
        assert!(ChirpId::from_string("seven").is_err());
    }
}
