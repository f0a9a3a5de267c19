//! Credential extraction from request headers

use crate::types::FunctionEvent;

/// Primary credential header
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// Fallback credential header
pub const API_KEY_HEADER: &str = "X-Api-Key";

const BEARER_PREFIX: &str = "Bearer ";

/// Extract the API key from the event headers
///
/// `Authorization` is consulted first and `X-Api-Key` only when it is missing
/// or empty. A leading `Bearer ` is stripped. Header names are matched exactly,
/// using the Pascal-Case the function platform delivers.
pub fn extract_key(event: &FunctionEvent) -> Option<&str> {
    let value = event
        .header(AUTHORIZATION_HEADER)
        .filter(|v| !v.is_empty())
        .or_else(|| event.header(API_KEY_HEADER))?;

    Some(strip_bearer(value))
}

/// Remove a case-sensitive `Bearer ` prefix if present
pub fn strip_bearer(value: &str) -> &str {
    value.strip_prefix(BEARER_PREFIX).unwrap_or(value)
}
