/// Error handling for the API server
///
/// Handlers return `ApiResult<T>`. Service failures convert via `?` and each
/// variant maps to one HTTP status with a JSON body:
///
/// ```json
/// { "error": "conflict", "message": "Email already in use" }
/// ```
///
/// # Example
///
/// ```
/// use repofav_api::error::{ApiError, ApiResult};
/// use axum::Json;
/// use serde_json::{json, Value};
///
/// async fn handler(code: Option<String>) -> ApiResult<Json<Value>> {
///     let code = code.ok_or_else(|| ApiError::BadRequest("Missing code".to_string()))?;
///     Ok(Json(json!({ "code": code })))
/// }
/// ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use repofav_shared::error::ServiceError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400)
    BadRequest(String),

    /// Request body failed field validation (400, with details)
    ValidationError(Vec<ValidationErrorDetail>),

    /// Unauthorized (401)
    Unauthorized(String),

    /// Conflict (409) - duplicate email, GitHub not connected
    Conflict(String),

    /// Internal server error (500)
    InternalError(String),

    /// GitHub failed (502)
    BadGateway(String),

    /// Feature not configured (503)
    ServiceUnavailable(String),
}

/// Validation error detail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "bad_request", "unauthorized")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
            ApiError::BadGateway(msg) => write!(f, "Bad gateway: {}", msg),
            ApiError::ServiceUnavailable(msg) => write!(f, "Service unavailable: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::ValidationError(errors) => (
                StatusCode::BAD_REQUEST,
                "invalid_input",
                "Request validation failed".to_string(),
                Some(errors),
            ),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
            ApiError::BadGateway(msg) => {
                tracing::warn!(upstream_error = %msg, "GitHub request failed");
                (
                    StatusCode::BAD_GATEWAY,
                    "bad_gateway",
                    "GitHub request failed".to_string(),
                    None,
                )
            }
            ApiError::ServiceUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "service_unavailable",
                msg,
                None,
            ),
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Convert domain errors to API errors
impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidInput(msg) => ApiError::BadRequest(msg),
            ServiceError::Unauthenticated(msg) => ApiError::Unauthorized(msg),
            ServiceError::Conflict(msg) => ApiError::Conflict(msg),
            ServiceError::Upstream(msg) => ApiError::BadGateway(msg),
            ServiceError::NotConfigured(msg) => ApiError::ServiceUnavailable(msg),
            ServiceError::Internal(msg) => ApiError::InternalError(msg),
        }
    }
}

/// Flattens `validator` errors into response details
impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut details: Vec<ValidationErrorDetail> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| ValidationErrorDetail {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Validation failed".to_string()),
                })
            })
            .collect();
        details.sort_by(|a, b| a.field.cmp(&b.field));

        ApiError::ValidationError(details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApiError::BadRequest("Invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: Invalid input");

        let err = ApiError::Conflict("Email already in use".to_string());
        assert_eq!(err.to_string(), "Conflict: Email already in use");
    }

    #[test]
    fn test_service_error_status_codes() {
        let cases = [
            (ServiceError::InvalidInput("x".into()), StatusCode::BAD_REQUEST),
            (ServiceError::Unauthenticated("x".into()), StatusCode::UNAUTHORIZED),
            (ServiceError::Conflict("x".into()), StatusCode::CONFLICT),
            (ServiceError::Upstream("x".into()), StatusCode::BAD_GATEWAY),
            (ServiceError::NotConfigured("x".into()), StatusCode::SERVICE_UNAVAILABLE),
            (ServiceError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).into_response().status(), status);
        }
    }

    #[tokio::test]
    async fn test_internal_error_hides_details() {
        let response = ApiError::InternalError("connection refused at 10.0.0.5".to_string())
            .into_response();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: ErrorResponse = serde_json::from_slice(&body).unwrap();

        assert_eq!(body.error, "internal_error");
        assert!(!body.message.contains("10.0.0.5"));
    }

    #[test]
    fn test_validation_error() {
        let errors = vec![
            ValidationErrorDetail {
                field: "email".to_string(),
                message: "Invalid email format".to_string(),
            },
            ValidationErrorDetail {
                field: "password".to_string(),
                message: "Password too short".to_string(),
            },
        ];

        let err = ApiError::ValidationError(errors);
        assert_eq!(err.to_string(), "Validation failed: 2 errors");
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
