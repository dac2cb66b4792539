// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::config::ConfigError;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// No usable access token in the request cookies.
    #[error("Google account not connected. Please connect your Google Business Profile.")]
    NotConnected,

    /// Google rejected the cached token.
    #[error("Authentication failed. Please reconnect your Google account.")]
    ReauthRequired,

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    /// Non-success answer from a Google API, passed through to the client.
    #[error("{context}: {status} - {body}")]
    Upstream {
        context: String,
        status: StatusCode,
        body: String,
    },

    #[error("Google API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Wrap a failed provider response, keeping its status and body.
    pub fn upstream(context: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        AppError::Upstream {
            context: context.into(),
            status: StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
            body: body.into(),
        }
    }

    /// Status code this error is reported with.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotConnected | AppError::ReauthRequired => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Upstream { status, .. } => *status,
            AppError::Http(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    connected: Option<bool>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (error, details, connected) = match &self {
            AppError::Config(err) => {
                tracing::error!(error = %err, "Configuration error");
                (err.to_string(), None, None)
            }
            AppError::NotConnected => (self.to_string(), None, Some(false)),
            AppError::ReauthRequired => (self.to_string(), None, None),
            AppError::BadRequest(msg) | AppError::NotFound(msg) => (msg.clone(), None, None),
            AppError::Upstream { .. } => (self.to_string(), None, None),
            AppError::Http(err) => {
                tracing::error!(error = %err, "Google API transport error");
                (
                    "Failed to fetch business data".to_string(),
                    Some(err.to_string()),
                    None,
                )
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (
                    "Failed to fetch business data".to_string(),
                    Some(err.to_string()),
                    None,
                )
            }
        };

        let body = ErrorResponse {
            error,
            details,
            connected,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
