use std::collections::HashMap;

use crate::config::KeyConfig;
use crate::types::{AuthorizationResult, Credential, UserInfo, DEFAULT_ROLE};

/// In-memory credential table parsed from an `API_KEYS` style string
///
/// Format: `key1:user1[:role1],key2:user2[:role2],...`. Parsing is permissive:
/// entries with fewer than two fields are dropped, and a later entry for the
/// same key replaces an earlier one.
#[derive(Debug, Clone, Default)]
pub struct KeyStore {
    keys: HashMap<String, UserInfo>,
}

impl KeyStore {
    /// Parse a credential string
    pub fn parse(raw: &str) -> Self {
        let mut keys = HashMap::new();

        for entry in raw.split(',') {
            let parts: Vec<&str> = entry.split(':').collect();
            if parts.len() < 2 {
                if !entry.trim().is_empty() {
                    tracing::debug!("Skipping malformed API key entry");
                }
                continue;
            }

            let key = parts[0].trim();
            let user_id = parts[1].trim();
            let role = parts.get(2).map_or(DEFAULT_ROLE, |r| r.trim());

            keys.insert(key.to_string(), UserInfo::new(user_id, role));
        }

        Self { keys }
    }

    /// Build a store from the configured credential string
    pub fn from_config(config: &KeyConfig) -> Self {
        Self::parse(config.raw())
    }

    /// Look up the identity bound to a key
    pub fn lookup(&self, key: &str) -> Option<&UserInfo> {
        self.keys.get(key)
    }

    /// Validate a candidate key; absent and empty keys are never authorized
    pub fn validate(&self, candidate: Option<&str>) -> AuthorizationResult {
        match candidate {
            Some(key) if !key.is_empty() => self
                .lookup(key)
                .cloned()
                .map_or_else(AuthorizationResult::denied, AuthorizationResult::granted),
            _ => AuthorizationResult::denied(),
        }
    }

    /// All credentials, ordered by user then key
    pub fn credentials(&self) -> Vec<Credential> {
        let mut credentials: Vec<Credential> = self
            .keys
            .iter()
            .map(|(key, user)| Credential {
                key: key.clone(),
                user: user.clone(),
            })
            .collect();
        credentials.sort_by(|a, b| {
            a.user
                .user_id
                .cmp(&b.user.user_id)
                .then_with(|| a.key.cmp(&b.key))
        });
        credentials
    }

    /// Get total number of keys
    pub fn count(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Check if a key exists
    pub fn has_key(&self, key: &str) -> bool {
        self.keys.contains_key(key)
    }
}

/// Validate a candidate key against a raw credential string
pub fn validate(candidate: Option<&str>, raw_keys: &str) -> AuthorizationResult {
    KeyStore::parse(raw_keys).validate(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_entries() {
        let store = KeyStore::parse("abc123:alice:admin,key1:bob:user");
        assert_eq!(store.count(), 2);
        assert_eq!(store.lookup("abc123"), Some(&UserInfo::new("alice", "admin")));
        assert_eq!(store.lookup("key1"), Some(&UserInfo::new("bob", "user")));
    }

    #[test]
    fn test_missing_role_defaults_to_user() {
        let store = KeyStore::parse("key1:bob");
        assert_eq!(store.lookup("key1").unwrap().role, "user");
    }

    #[test]
    fn test_short_entries_are_skipped() {
        let store = KeyStore::parse("lonely,key1:bob,,  ");
        assert_eq!(store.count(), 1);
        assert!(store.has_key("key1"));
        assert!(!store.has_key("lonely"));
    }

    #[test]
    fn test_fields_are_trimmed() {
        let store = KeyStore::parse(" key1 : bob : admin , key2:carol");
        assert_eq!(store.lookup("key1"), Some(&UserInfo::new("bob", "admin")));
        assert_eq!(store.lookup("key2"), Some(&UserInfo::new("carol", "user")));
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let store = KeyStore::parse("key1:bob:admin:extra:fields");
        assert_eq!(store.lookup("key1"), Some(&UserInfo::new("bob", "admin")));
    }

    #[test]
    fn test_empty_role_field_is_kept() {
        let store = KeyStore::parse("key1:bob:");
        assert_eq!(store.lookup("key1").unwrap().role, "");
    }

    #[test]
    fn test_duplicate_keys_last_write_wins() {
        let store = KeyStore::parse("key1:bob,key1:alice:admin");
        assert_eq!(store.count(), 1);
        assert_eq!(store.lookup("key1"), Some(&UserInfo::new("alice", "admin")));
    }

    #[test]
    fn test_empty_config_authorizes_nothing() {
        let store = KeyStore::parse("");
        assert!(store.is_empty());
        assert!(!store.validate(Some("anything")).authorized);
    }

    #[test]
    fn test_validate_known_key() {
        let result = validate(Some("key1"), "key1:bob");
        assert!(result.authorized);
        assert_eq!(result.user_info, Some(UserInfo::new("bob", "user")));
    }

    #[test]
    fn test_validate_unknown_key() {
        assert_eq!(validate(Some("nope"), "key1:bob"), AuthorizationResult::denied());
    }

    #[test]
    fn test_validate_absent_or_empty_key() {
        assert!(!validate(None, "key1:bob").authorized);
        assert!(!validate(Some(""), "key1:bob").authorized);
        // an entry with an empty key never matches
        assert!(!validate(Some(""), ":ghost:admin").authorized);
    }

    #[test]
    fn test_credentials_are_sorted() {
        let store = KeyStore::parse("k3:carol,k1:alice:admin,k2:bob");
        let credentials = store.credentials();
        let users: Vec<&str> = credentials
            .iter()
            .map(|c| c.user.user_id.as_str())
            .collect();
        assert_eq!(users, vec!["alice", "bob", "carol"]);
    }
}
