//! Request orchestration: authenticate, resolve, route

use crate::auth::extract_key;
use crate::config::KeyConfig;
use crate::error::GateError;
use crate::key_store::KeyStore;
use crate::routing::{resolve_path, route};
use crate::types::{FunctionEvent, FunctionResponse};

/// Handle a single function invocation
///
/// The credential table is parsed from `config` on every call. Every outcome
/// is a well-formed JSON response; nothing here fails.
pub fn handle(event: &FunctionEvent, config: &KeyConfig) -> FunctionResponse {
    let store = KeyStore::from_config(config);
    let auth = store.validate(extract_key(event));

    let (true, Some(user)) = (auth.authorized, auth.user_info) else {
        tracing::warn!("Missing or invalid API key");
        return GateError::Unauthorized.to_function_response();
    };

    let path = resolve_path(event);
    tracing::debug!(
        user_id = %user.user_id,
        method = event.method(),
        path = %path,
        "Routing request"
    );

    route(&path, event.method(), &user)
}
