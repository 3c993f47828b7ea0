//! Shared response envelope for API handlers.
//!
//! Every response body is `{ "success", "message", "data"?, "error"? }`.
//! Successful handlers build it with [`ApiResponse::ok`] or
//! [`ApiResponse::message`]; [`crate::error::AppError`] builds failures.

use serde::Serialize;

/// Standard response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Machine-readable error code, present on failures only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
}

impl<T: Serialize> ApiResponse<T> {
    /// A successful response carrying `data`.
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            error: None,
            code: None,
        }
    }
}

impl ApiResponse<()> {
    /// A successful response with no payload.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
            error: None,
            code: None,
        }
    }

    /// A failure; `message` is repeated in `error` for clients that read either.
    pub fn failure(message: String, code: &'static str) -> Self {
        Self {
            success: false,
            error: Some(message.clone()),
            message,
            data: None,
            code: Some(code),
        }
    }
}
