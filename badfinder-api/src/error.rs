/// Error handling for the API server
///
/// One unified error type that maps onto the response envelope. Handlers
/// return `ApiResult<T>`; any `ApiError` converts into an HTTP response with
/// the proper status code and `{success: false, message, errors?}` body.
///
/// Validation, conflict, and not-found conditions carry user-safe messages.
/// Internal errors are logged with full detail server-side and reduced to a
/// generic message client-side — stack traces and database errors never
/// reach the response body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use badfinder_shared::auth::{password::PasswordError, session::SessionError};

use crate::response::{ApiResponse, FieldError};

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Bad request (400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Missing or invalid session (401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated but not allowed (403)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Referenced resource absent (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Duplicate unique key (409)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Malformed client input with field detail (400)
    #[error("Validation failed: {} error(s)", .0.len())]
    Validation(Vec<FieldError>),

    /// Anything unexpected (500); detail is logged, never returned
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, errors) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, None),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg, None),
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                "Invalid input data".to_string(),
                Some(errors),
            ),
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred".to_string(),
                    None,
                )
            }
        };

        let body = Json(ApiResponse::<()> {
            success: false,
            message,
            data: None,
            errors,
        });

        (status, body).into_response()
    }
}

/// Converts database errors to API errors
///
/// Unique-constraint violations become conflicts with a message matching
/// the constraint; everything else is internal.
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => {
                if let Some(constraint) = db_err.constraint() {
                    if constraint.contains("email") {
                        return ApiError::Conflict("Email is already registered".to_string());
                    }
                    if constraint.contains("circle_members") {
                        return ApiError::Conflict(
                            "User is already a member of this circle".to_string(),
                        );
                    }
                    return ApiError::Conflict(format!("Constraint violation: {}", constraint));
                }

                ApiError::Internal(format!("Database error: {}", db_err))
            }
            _ => ApiError::Internal(format!("Database error: {}", err)),
        }
    }
}

/// Converts request-body validation failures into field-level errors
impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        let errors: Vec<FieldError> = err
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| FieldError {
                    path: vec![field.to_string()],
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Validation failed".to_string()),
                })
            })
            .collect();

        ApiError::Validation(errors)
    }
}

/// Converts session token errors to API errors
impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Expired => ApiError::Unauthorized("Session has expired".to_string()),
            SessionError::CreateError(msg) => {
                ApiError::Internal(format!("Session token creation failed: {}", msg))
            }
            SessionError::ValidationError(_) => {
                ApiError::Unauthorized("Invalid session".to_string())
            }
        }
    }
}

/// Converts password hashing errors to API errors
impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::Internal(format!("Password operation failed: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_error_display() {
        let err = ApiError::BadRequest("Invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: Invalid input");

        let err = ApiError::NotFound("Circle not found".to_string());
        assert_eq!(err.to_string(), "Not found: Circle not found");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::Unauthorized("x".into()).into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Conflict("x".into()).into_response().status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::Validation(vec![]).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Internal("x".into()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_validation_errors_carry_field_paths() {
        #[derive(Validate)]
        struct Form {
            #[validate(range(min = 0, message = "Fee must be zero or greater"))]
            fee: i32,
        }

        let err = Form { fee: -100 }.validate().unwrap_err();
        let api_err = ApiError::from(err);

        match api_err {
            ApiError::Validation(errors) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].path, vec!["fee".to_string()]);
                assert_eq!(errors[0].message, "Fee must be zero or greater");
            }
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_row_not_found_maps_to_404() {
        let api_err = ApiError::from(sqlx::Error::RowNotFound);
        assert!(matches!(api_err, ApiError::NotFound(_)));
    }
}
