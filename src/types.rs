use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::io::{self, Write};

/// Role granted by a credential when the configuration omits one
pub const DEFAULT_ROLE: &str = "user";

/// The only role treated specially by the router
pub const ADMIN_ROLE: &str = "admin";

/// Identity attached to a valid API key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    /// User identifier
    pub user_id: String,
    /// Privilege level (e.g., "user", "admin")
    pub role: String,
}

impl UserInfo {
    /// Create a new user info
    pub fn new(user_id: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            role: role.into(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }
}

impl std::fmt::Display for UserInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.user_id, self.role)
    }
}

/// A single configured credential: key, user and role
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub key: String,
    pub user: UserInfo,
}

/// Outcome of validating a candidate key
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorizationResult {
    pub authorized: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_info: Option<UserInfo>,
}

impl AuthorizationResult {
    pub fn granted(user_info: UserInfo) -> Self {
        Self {
            authorized: true,
            user_info: Some(user_info),
        }
    }

    pub fn denied() -> Self {
        Self {
            authorized: false,
            user_info: None,
        }
    }
}

// ============================================================================
// Function Event Types
// ============================================================================

/// Inbound request as delivered by the cloud function trigger
///
/// Every field is optional on the wire; `null` and missing values fall back to
/// the defaults exposed by the accessor methods.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionEvent {
    /// Request headers, keyed exactly as the platform delivers them
    #[serde(default)]
    pub headers: Option<HashMap<String, String>>,
    /// HTTP method
    #[serde(default)]
    pub http_method: Option<String>,
    /// Request path
    #[serde(default)]
    pub path: Option<String>,
    /// Query string parameters
    #[serde(default)]
    pub query_string_parameters: Option<HashMap<String, String>>,
    /// Raw request body
    #[serde(default)]
    pub body: Option<String>,
}

impl FunctionEvent {
    /// Create an event for the given method and path
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            http_method: Some(method.into()),
            path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Add a header
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(HashMap::new)
            .insert(name.into(), value.into());
        self
    }

    /// Add a query string parameter
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_string_parameters
            .get_or_insert_with(HashMap::new)
            .insert(name.into(), value.into());
        self
    }

    /// Set the body
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .as_ref()
            .and_then(|h| h.get(name))
            .map(String::as_str)
    }

    pub fn method(&self) -> &str {
        self.http_method.as_deref().unwrap_or("GET")
    }

    pub fn path(&self) -> &str {
        self.path.as_deref().unwrap_or("/")
    }

    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query_string_parameters
            .as_ref()
            .and_then(|q| q.get(name))
            .map(String::as_str)
    }

    pub fn body(&self) -> &str {
        self.body.as_deref().unwrap_or("")
    }
}

/// Response handed back to the cloud function trigger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionResponse {
    /// HTTP status code
    pub status_code: u16,
    /// JSON-encoded body
    pub body: String,
    /// Response headers
    pub headers: BTreeMap<String, String>,
}

impl FunctionResponse {
    /// Build a response with a JSON body and `Content-Type: application/json`
    pub fn json<T: Serialize>(status_code: u16, body: &T) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());

        Self {
            status_code,
            body: encode_body(body).unwrap_or_else(|_| String::from("{}")),
            headers,
        }
    }
}

/// Encode a response body the way the function platform's JSON encoder does
///
/// Items are separated by `", "`, keys by `": "`, and every non-ASCII
/// character is written as a `\uXXXX` escape.
pub fn encode_body<T: Serialize>(body: &T) -> serde_json::Result<String> {
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, SpacedAsciiFormatter);
    body.serialize(&mut serializer)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

struct SpacedAsciiFormatter;

impl serde_json::ser::Formatter for SpacedAsciiFormatter {
    fn begin_array_value<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        let mut start = 0;
        for (i, ch) in fragment.char_indices() {
            if ch.is_ascii() {
                continue;
            }
            writer.write_all(fragment[start..i].as_bytes())?;
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{:04x}", unit)?;
            }
            start = i + ch.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // === UserInfo tests ===

    #[test]
    fn test_user_info_is_admin() {
        assert!(UserInfo::new("alice", "admin").is_admin());
        assert!(!UserInfo::new("bob", "user").is_admin());
        assert!(!UserInfo::new("eve", "Admin").is_admin());
    }

    #[test]
    fn test_user_info_display() {
        assert_eq!(UserInfo::new("alice", "admin").to_string(), "alice (admin)");
    }

    // === AuthorizationResult tests ===

    #[test]
    fn test_denied_omits_user_info() {
        let json = serde_json::to_value(AuthorizationResult::denied()).unwrap();
        assert_eq!(json, serde_json::json!({ "authorized": false }));
    }

    #[test]
    fn test_granted_carries_user_info() {
        let result = AuthorizationResult::granted(UserInfo::new("bob", "user"));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["authorized"], true);
        assert_eq!(json["user_info"]["user_id"], "bob");
        assert_eq!(json["user_info"]["role"], "user");
    }

    // === FunctionEvent tests ===

    #[test]
    fn test_event_defaults_when_fields_missing() {
        let event: FunctionEvent = serde_json::from_str("{}").unwrap();
        assert_eq!(event.method(), "GET");
        assert_eq!(event.path(), "/");
        assert_eq!(event.body(), "");
        assert!(event.header("Authorization").is_none());
        assert!(event.query_param("path").is_none());
    }

    #[test]
    fn test_event_accepts_null_fields() {
        let event: FunctionEvent = serde_json::from_str(
            r#"{"headers": null, "queryStringParameters": null, "body": null, "path": null}"#,
        )
        .unwrap();
        assert_eq!(event.path(), "/");
        assert_eq!(event.body(), "");
        assert!(event.query_param("path").is_none());
    }

    #[test]
    fn test_event_deserializes_platform_fields() {
        let event: FunctionEvent = serde_json::from_str(
            r#"{
                "httpMethod": "POST",
                "path": "/foo",
                "headers": {"X-Api-Key": "key1"},
                "queryStringParameters": {"path": "/profile"},
                "body": "{}",
                "isBase64Encoded": false
            }"#,
        )
        .unwrap();
        assert_eq!(event.method(), "POST");
        assert_eq!(event.path(), "/foo");
        assert_eq!(event.header("X-Api-Key"), Some("key1"));
        assert_eq!(event.query_param("path"), Some("/profile"));
        assert_eq!(event.body(), "{}");
    }

    #[test]
    fn test_event_header_lookup_is_case_sensitive() {
        let event = FunctionEvent::default().with_header("authorization", "Bearer k");
        assert!(event.header("Authorization").is_none());
        assert_eq!(event.header("authorization"), Some("Bearer k"));
    }

    // === FunctionResponse tests ===

    #[test]
    fn test_response_serializes_platform_shape() {
        let response = FunctionResponse::json(200, &serde_json::json!({ "message": "ok" }));
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["statusCode"], 200);
        assert_eq!(json["body"], r#"{"message": "ok"}"#);
        assert_eq!(json["headers"]["Content-Type"], "application/json");
    }

    // === encode_body tests ===

    #[test]
    fn test_encode_body_separators() {
        let body = serde_json::json!({ "a": [1, 2], "b": {} });
        assert_eq!(encode_body(&body).unwrap(), r#"{"a": [1, 2], "b": {}}"#);
    }

    #[test]
    fn test_encode_body_escapes_non_ascii() {
        let body = serde_json::json!({ "user": "Жора", "emoji": "a😀" });
        assert_eq!(
            encode_body(&body).unwrap(),
            r#"{"emoji": "a\ud83d\ude00", "user": "\u0416\u043e\u0440\u0430"}"#
        );
    }

    #[test]
    fn test_encode_body_keeps_standard_escapes() {
        let body = serde_json::json!({ "s": "line\n\"quoted\"" });
        assert_eq!(encode_body(&body).unwrap(), r#"{"s": "line\n\"quoted\""}"#);
    }
}
