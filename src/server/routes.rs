//! HTTP route handlers

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::KeyConfig;
use crate::handler::handle;
use crate::types::{FunctionEvent, FunctionResponse};

/// Where the server reads its credential string from
#[derive(Debug, Clone)]
pub enum KeySource {
    /// Re-read `API_KEYS` on every request
    Env,
    /// Fixed credential string
    Static(Arc<str>),
}

impl KeySource {
    /// Snapshot the configuration for one request
    pub fn config(&self) -> KeyConfig {
        match self {
            KeySource::Env => KeyConfig::from_env(),
            KeySource::Static(raw) => KeyConfig::new(raw.to_string()),
        }
    }
}

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    pub keys: KeySource,
}

impl AppState {
    pub fn from_env() -> Self {
        Self {
            keys: KeySource::Env,
        }
    }

    pub fn with_keys(raw: impl Into<String>) -> Self {
        let raw: String = raw.into();
        Self {
            keys: KeySource::Static(Arc::from(raw)),
        }
    }
}

/// Health check endpoint - always returns 200
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy"
    }))
}

/// Forward any other request to the function handler
pub async fn invoke(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    query: Option<Query<HashMap<String, String>>>,
    body: Bytes,
) -> FunctionResponse {
    let query = query.map(|Query(q)| q).unwrap_or_default();
    let event = to_event(&method, &uri, &headers, query, &body);
    handle(&event, &state.keys.config())
}

/// Build a function event from an HTTP request
pub fn to_event(
    method: &Method,
    uri: &Uri,
    headers: &HeaderMap,
    query: HashMap<String, String>,
    body: &[u8],
) -> FunctionEvent {
    let mut event_headers = HashMap::new();
    for (name, value) in headers {
        let Ok(value) = value.to_str() else {
            tracing::debug!("Skipping non-ASCII value for header {}", name);
            continue;
        };
        event_headers
            .entry(canonical_header_name(name.as_str()))
            .or_insert_with(|| value.to_string());
    }

    FunctionEvent {
        headers: Some(event_headers),
        http_method: Some(method.as_str().to_string()),
        path: Some(uri.path().to_string()),
        query_string_parameters: Some(query),
        body: Some(String::from_utf8_lossy(body).into_owned()),
    }
}

/// Re-case a lowercase header name the way the function platform delivers it
///
/// `x-api-key` becomes `X-Api-Key`.
pub fn canonical_header_name(name: &str) -> String {
    name.split('-')
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

impl IntoResponse for FunctionResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, self.body).into_response();

        for (name, value) in &self.headers {
            match (
                HeaderName::try_from(name.as_str()),
                HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(value)) => {
                    response.headers_mut().insert(name, value);
                }
                _ => tracing::warn!("Dropping invalid response header: {}", name),
            }
        }

        response
    }
}
