//! Runtime configuration

/// Environment variable holding the credential list
pub const API_KEYS_VAR: &str = "API_KEYS";

/// Raw credential configuration (`key:user[:role],...`)
///
/// The string is carried as-is; parsing happens per request in
/// [`KeyStore::parse`](crate::KeyStore::parse).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyConfig {
    raw: String,
}

impl KeyConfig {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// Read `API_KEYS` from the environment; unset reads as empty
    pub fn from_env() -> Self {
        Self::new(std::env::var(API_KEYS_VAR).unwrap_or_default())
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn is_empty(&self) -> bool {
        self.raw.trim().is_empty()
    }
}
