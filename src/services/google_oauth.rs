// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Google OAuth2 authorization-code flow.
//!
//! Handles:
//! - Consent URL construction (offline access, forced consent)
//! - Code exchange at the token endpoint
//! - Token introspection for diagnostics

use crate::config::{GoogleEndpoints, OAuthCredentials};
use crate::models::{AccessToken, TokenBundle};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

/// Business Profile scopes requested at consent time.
pub const SCOPES: [&str; 3] = [
    "https://www.googleapis.com/auth/business.manage",
    "https://www.googleapis.com/auth/places",
    "https://www.googleapis.com/auth/business.readonly",
];

/// Code exchange failures.
#[derive(Debug, thiserror::Error)]
pub enum TokenExchangeError {
    #[error("Token exchange failed: {status}")]
    Rejected { status: u16, body: String },

    #[error("Missing required tokens")]
    MissingTokens,

    #[error("Invalid token lifetime: {0}")]
    InvalidLifetime(i64),

    #[error("Token exchange request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Raw token endpoint response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    refresh_token: Option<String>,
    expires_in: Option<i64>,
}

/// Outcome of a tokeninfo lookup.
#[derive(Debug)]
pub enum TokenInfo {
    Valid(Value),
    Invalid { status: u16, details: String },
}

/// Google OAuth client.
#[derive(Clone)]
pub struct GoogleOAuthClient {
    http: reqwest::Client,
    endpoints: GoogleEndpoints,
}

impl GoogleOAuthClient {
    pub fn new(http: reqwest::Client, endpoints: GoogleEndpoints) -> Self {
        Self { http, endpoints }
    }

    /// Consent screen URL for the Business Profile scopes.
    ///
    /// `prompt=consent` makes Google issue a refresh token on repeat grants.
    pub fn authorization_url(&self, creds: &OAuthCredentials) -> String {
        format!(
            "{}?\
             client_id={}&\
             redirect_uri={}&\
             response_type=code&\
             scope={}&\
             access_type=offline&\
             prompt=consent&\
             include_granted_scopes=true",
            self.endpoints.auth_url,
            urlencoding::encode(&creds.client_id),
            urlencoding::encode(&creds.redirect_uri),
            urlencoding::encode(&SCOPES.join(" ")),
        )
    }

    /// Exchange an authorization code for tokens.
    pub async fn exchange_code(
        &self,
        creds: &OAuthCredentials,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<TokenBundle, TokenExchangeError> {
        tracing::info!(
            client_id = %creds.client_id,
            redirect_uri = %creds.redirect_uri,
            "Exchanging authorization code for tokens"
        );

        let response = self
            .http
            .post(&self.endpoints.token_url)
            .form(&[
                ("client_id", creds.client_id.as_str()),
                ("client_secret", creds.client_secret.as_str()),
                ("code", code),
                ("grant_type", "authorization_code"),
                ("redirect_uri", creds.redirect_uri.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        tracing::info!(status = status.as_u16(), "Token endpoint responded");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), body = %body, "Token exchange failed");
            return Err(TokenExchangeError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let tokens: TokenResponse = response.json().await?;

        let non_empty = |v: Option<String>| v.filter(|s| !s.is_empty());
        match (
            non_empty(tokens.access_token),
            non_empty(tokens.refresh_token),
        ) {
            (Some(access), Some(refresh)) => {
                let bundle = TokenBundle::new(access, refresh, tokens.expires_in, now)
                    .ok_or(TokenExchangeError::InvalidLifetime(
                        tokens.expires_in.unwrap_or_default(),
                    ))?;
                tracing::info!(expires_at = %bundle.expires_at, "Tokens received");
                Ok(bundle)
            }
            _ => Err(TokenExchangeError::MissingTokens),
        }
    }

    /// Ask Google what it knows about `token`.
    pub async fn token_info(&self, token: &AccessToken) -> Result<TokenInfo, reqwest::Error> {
        let response = self
            .http
            .get(&self.endpoints.tokeninfo_url)
            .query(&[("access_token", token.as_str())])
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(TokenInfo::Valid(response.json().await?))
        } else {
            let details = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), details = %details, "Token info lookup failed");
            Ok(TokenInfo::Invalid {
                status: status.as_u16(),
                details,
            })
        }
    }
}
