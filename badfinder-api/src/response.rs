/// Unified API response envelope
///
/// Every endpoint answers with the same shape:
///
/// ```json
/// {
///   "success": true,
///   "message": "Circle created successfully",
///   "data": { ... },
///   "errors": [{ "path": ["fee"], "message": "..." }]
/// }
/// ```
///
/// `data` is present on success, `errors` on validation failure; both are
/// omitted (not null) when absent.

use axum::{http::StatusCode, Json};
use serde::{Deserialize, Serialize};

/// One field-level validation error
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldError {
    /// Path of the offending field, e.g. `["fee"]`
    pub path: Vec<String>,

    /// Human-readable message
    pub message: String,
}

impl FieldError {
    /// Convenience constructor for a single-segment path
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: vec![field.into()],
            message: message.into(),
        }
    }
}

/// The response envelope
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the request succeeded
    pub success: bool,

    /// Human-readable summary
    pub message: String,

    /// Payload, present on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    /// Field-level errors, present on validation failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

/// 200 OK with data
pub fn ok<T: Serialize>(
    data: T,
    message: impl Into<String>,
) -> (StatusCode, Json<ApiResponse<T>>) {
    with_status(StatusCode::OK, data, message)
}

/// 201 Created with data
pub fn created<T: Serialize>(
    data: T,
    message: impl Into<String>,
) -> (StatusCode, Json<ApiResponse<T>>) {
    with_status(StatusCode::CREATED, data, message)
}

fn with_status<T: Serialize>(
    status: StatusCode,
    data: T,
    message: impl Into<String>,
) -> (StatusCode, Json<ApiResponse<T>>) {
    (
        status,
        Json(ApiResponse {
            success: true,
            message: message.into(),
            data: Some(data),
            errors: None,
        }),
    )
}
