//! Axum application builder with all routes and middleware

use axum::routing::{get, Router};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use super::routes::{self, AppState};

/// Create the application, reading `API_KEYS` on every request
pub fn create_app() -> Router {
    build_app(AppState::from_env())
}

/// Create the application with a fixed credential string
pub fn create_app_with_keys(api_keys: impl Into<String>) -> Router {
    build_app(AppState::with_keys(api_keys))
}

fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .fallback(routes::invoke)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: std::env::var("KEY_GATE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("KEY_GATE_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(9000),
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
