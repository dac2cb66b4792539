// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Google token authentication middleware.

use crate::error::AppError;
use crate::models::AccessToken;
use axum::{extract::Request, middleware::Next, response::Response};
use axum_extra::extract::cookie::CookieJar;

/// Middleware that requires an unexpired Google access token cookie.
///
/// The token is placed in request extensions for handlers to extract with
/// `Extension<AccessToken>`. No Google call is made without it.
pub async fn require_google_token(
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(token) = AccessToken::from_cookies(&jar, chrono::Utc::now()) else {
        tracing::info!(path = %request.uri().path(), "No valid access token found");
        return Err(AppError::NotConnected);
    };

    tracing::debug!(token = %token.preview(), "Access token found");
    request.extensions_mut().insert(token);

    Ok(next.run(request).await)
}
