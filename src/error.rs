use axum::http::StatusCode;
use thiserror::Error;

use crate::types::FunctionResponse;

#[derive(Debug, Error)]
pub enum GateError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Admin access required")]
    AdminRequired,

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl GateError {
    /// Map error to HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            GateError::Unauthorized => StatusCode::FORBIDDEN,
            GateError::AdminRequired => StatusCode::FORBIDDEN,
            GateError::JsonError(_) => StatusCode::BAD_REQUEST,
            GateError::IoError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Render the error as a function response with an `{"error": ...}` body
    pub fn to_function_response(&self) -> FunctionResponse {
        FunctionResponse::json(
            self.status_code().as_u16(),
            &serde_json::json!({ "error": self.to_string() }),
        )
    }
}

pub type Result<T> = std::result::Result<T, GateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_denials_map_to_forbidden() {
        assert_eq!(GateError::Unauthorized.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(GateError::AdminRequired.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_unauthorized_function_response() {
        let response = GateError::Unauthorized.to_function_response();
        assert_eq!(response.status_code, 403);
        assert_eq!(response.body, r#"{"error": "Unauthorized"}"#);
        assert_eq!(response.headers["Content-Type"], "application/json");
    }

    #[test]
    fn test_admin_required_function_response() {
        let response = GateError::AdminRequired.to_function_response();
        assert_eq!(response.status_code, 403);
        assert_eq!(response.body, r#"{"error": "Admin access required"}"#);
    }

    #[test]
    fn test_json_error_is_bad_request() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = GateError::from(err);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().starts_with("JSON error"));
    }
}
