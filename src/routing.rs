//! Effective path resolution and route dispatch

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::GateError;
use crate::types::{FunctionEvent, FunctionResponse, UserInfo};

/// Known routes; anything else falls through to the echo response
#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    Profile,
    Admin,
    Echo(Value),
}

impl Route {
    /// Classify an effective path
    ///
    /// Only the exact strings `/profile` and `/admin` are known routes. Any
    /// other value, including non-string overrides from a JSON body, is echoed.
    pub fn parse(path: &Value) -> Self {
        match path.as_str() {
            Some("/profile") => Route::Profile,
            Some("/admin") => Route::Admin,
            _ => Route::Echo(path.clone()),
        }
    }
}

/// Body for `/profile`
#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub user_id: String,
    pub role: String,
    pub message: String,
}

/// Body carrying a single message
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Body for the fallback route
#[derive(Debug, Serialize, Deserialize)]
pub struct EchoResponse {
    pub message: String,
    pub user: String,
    pub method: String,
    pub path: Value,
}

/// Whether a JSON value counts as set: not null, false, zero or empty
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Read the `path` field from a JSON object body
///
/// Any set value is returned as-is, strings or not. Returns `None` when the
/// field is missing or unset, and for bodies that are not JSON objects.
pub fn body_path(body: &str) -> Option<Value> {
    if body.is_empty() {
        return None;
    }

    let mut parsed: Value = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::debug!("Ignoring request body for path override: {}", e);
            return None;
        }
    };

    parsed
        .as_object_mut()
        .and_then(|object| object.remove("path"))
        .filter(is_truthy)
}

/// Resolve the path used for routing
///
/// Precedence, lowest to highest: the event path (default `/`), a non-empty
/// `path` query parameter, a set `path` field in a JSON body.
pub fn resolve_path(event: &FunctionEvent) -> Value {
    let mut path = Value::from(event.path());

    if let Some(query_path) = event.query_param("path").filter(|p| !p.is_empty()) {
        path = Value::from(query_path);
    }

    if let Some(override_path) = body_path(event.body()) {
        path = override_path;
    }

    path
}

/// Dispatch an authenticated request
pub fn route(path: &Value, method: &str, user: &UserInfo) -> FunctionResponse {
    match Route::parse(path) {
        Route::Profile => FunctionResponse::json(
            200,
            &ProfileResponse {
                user_id: user.user_id.clone(),
                role: user.role.clone(),
                message: "Profile data".to_string(),
            },
        ),
        Route::Admin if !user.is_admin() => {
            tracing::warn!(user_id = %user.user_id, "Admin access denied");
            GateError::AdminRequired.to_function_response()
        }
        Route::Admin => FunctionResponse::json(
            200,
            &MessageResponse {
                message: "Admin panel access granted".to_string(),
            },
        ),
        Route::Echo(path) => FunctionResponse::json(
            200,
            &EchoResponse {
                message: "API is working".to_string(),
                user: user.user_id.clone(),
                method: method.to_string(),
                path,
            },
        ),
    }
}
