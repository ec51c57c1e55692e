// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Error types for the session core and consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::time::Duration;

/// Failures of the session and role reconciliation core.
///
/// Only `InvalidAssertion`, `SignInFailed` and `InvalidSignInForm` are meant
/// for the user. A store outage is not an error here: reconciliation reports
/// it as a pending outcome (see [`StoreError`]).
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Invalid identity assertion: {0}")]
    InvalidAssertion(String),

    #[error("Session expired")]
    ExpiredSession,

    #[error("Sign-in failed: {0}")]
    SignInFailed(String),

    #[error("Invalid sign-in form: {0}")]
    InvalidSignInForm(String),
}

/// User record store failures. Absence of a record is not an error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("store call timed out after {0:?}")]
    Timeout(Duration),
}

/// Matching/event service failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum MatchingError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid response body: {0}")]
    Decode(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),
}

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Session(#[from] SessionError),
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

const SIGN_IN_RETRY_MESSAGE: &str = "Failed to sign in. Please try again.";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            AppError::Session(err) => match err {
                SessionError::InvalidAssertion(msg) | SessionError::SignInFailed(msg) => {
                    tracing::warn!(error = %msg, "Sign-in rejected");
                    (
                        StatusCode::UNAUTHORIZED,
                        "sign_in_failed",
                        Some(SIGN_IN_RETRY_MESSAGE.to_string()),
                    )
                }
                SessionError::InvalidSignInForm(msg) => (
                    StatusCode::BAD_REQUEST,
                    "invalid_sign_in_form",
                    Some(msg.clone()),
                ),
                SessionError::ExpiredSession => {
                    (StatusCode::UNAUTHORIZED, "unauthorized", None)
                }
            },
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_assertion_is_user_facing() {
        let response =
            AppError::from(SessionError::InvalidAssertion("bad segment".into())).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_invalid_form_is_bad_request() {
        let response = AppError::from(SessionError::InvalidSignInForm(
            "mobile must be exactly 10 digits".into(),
        ))
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_store_timeout_message() {
        let err = StoreError::Timeout(Duration::from_secs(2));
        assert_eq!(err.to_string(), "store call timed out after 2s");
    }
}
