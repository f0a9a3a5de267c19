//! # Key Gate
//!
//! Static API key authorization and routing for a cloud function handler.
//!
//! ## Features
//!
//! - **Static credentials** - Keys, users and roles come from a single `API_KEYS` string
//! - **Bearer or header keys** - `Authorization: Bearer <key>` or `X-Api-Key: <key>`
//! - **Fixed routes** - `/profile`, `/admin` (admin role only) and an echo fallback
//! - **Path overrides** - The routed path can come from a `path` query parameter or JSON body
//! - **HTTP adapter** - Serve the same handler locally through axum
//!
//! ## Quick Start
//!
//! ```rust
//! use key_gate::{handle, FunctionEvent, KeyConfig};
//!
//! let config = KeyConfig::new("abc123:alice:admin,key1:bob");
//! let event = FunctionEvent::new("GET", "/admin")
//!     .with_header("Authorization", "Bearer abc123");
//!
//! let response = handle(&event, &config);
//! assert_eq!(response.status_code, 200);
//! assert_eq!(response.body, r#"{"message": "Admin panel access granted"}"#);
//! ```
//!
//! ## Raw Events
//!
//! When the platform hands over the event as JSON, use [`handle_event_json`]:
//!
//! ```rust
//! let event = r#"{"httpMethod": "GET", "path": "/", "headers": {"X-Api-Key": "key1"}}"#;
//! let response = key_gate::handle_event_json(event, "key1:bob").unwrap();
//! assert!(response.contains(r#""statusCode":200"#));
//! ```
//!
//! ## Environment Variables
//!
//! - `API_KEYS` - Credential list, `key1:user1[:role1],key2:user2[:role2],...`
//!
//! ## CLI Usage
//!
//! ```bash
//! # Run an event through the handler
//! key-gate invoke --event event.json
//!
//! # Show configured users
//! key-gate keys
//!
//! # Check a single key
//! key-gate check abc123
//! ```

// Module declarations
pub mod auth;
pub mod config;
pub mod error;
pub mod handler;
pub mod key_store;
pub mod routing;
pub mod server;
pub mod types;

// Re-exports for convenience
pub use auth::extract_key;
pub use config::KeyConfig;
pub use error::{GateError, Result};
pub use handler::handle;
pub use key_store::{validate, KeyStore};
pub use routing::{resolve_path, route, Route};
pub use types::{AuthorizationResult, Credential, FunctionEvent, FunctionResponse, UserInfo};

/// Run a JSON-encoded platform event through the handler
///
/// Returns the JSON-encoded response object (`statusCode`, `body`, `headers`).
/// Only a malformed event is an error; authorization failures are responses.
///
/// # Example
///
/// ```rust
/// use key_gate::handle_event_json;
///
/// let response = handle_event_json("{}", "key1:bob").unwrap();
/// assert!(response.contains("Unauthorized"));
/// ```
pub fn handle_event_json(event_json: &str, api_keys: &str) -> Result<String> {
    let event: FunctionEvent = serde_json::from_str(event_json)?;
    let response = handle(&event, &KeyConfig::new(api_keys));
    Ok(serde_json::to_string(&response)?)
}
