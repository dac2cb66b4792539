// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Google OAuth authentication routes.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::Redirect,
    routing::get,
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::Result;
use crate::models::{token, AccessToken};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth", get(auth_start))
        .route("/api/auth/callback", get(auth_callback))
        .route("/api/auth/status", get(auth_status).delete(disconnect))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AuthUrlResponse {
    pub auth_url: String,
}

/// Start OAuth flow - hand the consent URL to the client.
///
/// The client performs the redirect itself.
async fn auth_start(State(state): State<Arc<AppState>>) -> Result<Json<AuthUrlResponse>> {
    let creds = state.config.oauth()?;
    let auth_url = state.oauth.authorization_url(creds);

    tracing::info!(client_id = %creds.client_id, "Starting OAuth flow");

    Ok(Json(AuthUrlResponse { auth_url }))
}

#[derive(Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// OAuth callback - exchange code for tokens, store them as cookies.
///
/// Every outcome is a redirect to the application root carrying
/// `auth=success` or `auth=error&message=...`.
async fn auth_callback(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    params: std::result::Result<Query<CallbackParams>, QueryRejection>,
) -> (CookieJar, Redirect) {
    let base_url = state
        .config
        .oauth()
        .map(|c| c.app_base_url.clone())
        .unwrap_or_default();

    match complete_authorization(&state, jar.clone(), params).await {
        Ok(jar) => {
            tracing::info!("Tokens stored in cookies");
            (jar, Redirect::temporary(&format!("{base_url}/?auth=success")))
        }
        Err(message) => {
            tracing::warn!(message = %message, "OAuth callback failed");
            let redirect = format!(
                "{base_url}/?auth=error&message={}",
                urlencoding::encode(&message)
            );
            (jar, Redirect::temporary(&redirect))
        }
    }
}

async fn complete_authorization(
    state: &AppState,
    jar: CookieJar,
    params: std::result::Result<Query<CallbackParams>, QueryRejection>,
) -> std::result::Result<CookieJar, String> {
    let Query(params) = params.map_err(|e| format!("Invalid callback parameters: {e}"))?;

    tracing::info!(
        code_present = params.code.is_some(),
        error = ?params.error,
        "OAuth callback received"
    );

    if let Some(error) = params.error {
        return Err(format!("OAuth failed: {error}"));
    }

    let code = params
        .code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| "No authorization code".to_string())?;

    let creds = state.config.oauth().map_err(|e| e.to_string())?;

    let bundle = state
        .oauth
        .exchange_code(creds, &code, chrono::Utc::now())
        .await
        .map_err(|e| e.to_string())?;

    Ok(bundle.write_cookies(jar, state.config.secure_cookies))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AuthStatusResponse {
    pub is_authenticated: bool,
}

/// Report whether an unexpired access token is cached.
async fn auth_status(jar: CookieJar) -> Json<AuthStatusResponse> {
    Json(AuthStatusResponse {
        is_authenticated: AccessToken::from_cookies(&jar, chrono::Utc::now()).is_some(),
    })
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DisconnectResponse {
    pub success: bool,
}

/// Disconnect - expire all token cookies.
///
/// Tokens are not revoked at Google.
async fn disconnect(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> (CookieJar, Json<DisconnectResponse>) {
    tracing::info!("Disconnecting Google account");
    let jar = token::clear_cookies(jar, state.config.secure_cookies);
    (jar, Json(DisconnectResponse { success: true }))
}
