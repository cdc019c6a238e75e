use http::header::AUTHORIZATION;
use http::HeaderMap;

use super::errors::AuthError;

const BEARER_SCHEME: &str = "Bearer";

/// Extract the bearer token from request headers.
///
/// The `Authorization` value is split once on the first space; the scheme
/// must be exactly `Bearer` and the remainder is returned verbatim. The token
/// itself is not inspected.
///
/// # Errors
/// * `MissingHeader` - Header absent or empty
/// * `MalformedHeader` - Not valid UTF-8, no space, or another scheme
pub fn extract_bearer(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers.get(AUTHORIZATION).ok_or(AuthError::MissingHeader)?;
    if value.is_empty() {
        return Err(AuthError::MissingHeader);
    }

    let value = value.to_str().map_err(|_| AuthError::MalformedHeader)?;

    match value.split_once(' ') {
        Some((BEARER_SCHEME, token)) => Ok(token),
        _ => Err(AuthError::MalformedHeader),
    }
}
