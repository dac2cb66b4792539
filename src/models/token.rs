// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OAuth token bundle and its cookie representation.
//!
//! The bundle is the only state that outlives a request. It is written as
//! three independent cookies by the OAuth callback and read back by every
//! proxied call.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{DateTime, Utc};
use std::fmt;

pub const ACCESS_TOKEN_COOKIE: &str = "google_access_token";
pub const REFRESH_TOKEN_COOKIE: &str = "google_refresh_token";
pub const TOKEN_EXPIRY_COOKIE: &str = "google_token_expiry";

/// Lifetime used when Google omits `expires_in`.
pub const DEFAULT_EXPIRES_IN_SECS: i64 = 3600;
const REFRESH_TOKEN_MAX_AGE_SECS: i64 = 30 * 24 * 60 * 60;

/// Tokens obtained from a successful code exchange.
#[derive(Clone)]
pub struct TokenBundle {
    pub access_token: String,
    pub refresh_token: String,
    /// Seconds the access token stays valid, as reported by Google.
    pub expires_in: i64,
    pub expires_at: DateTime<Utc>,
}

impl TokenBundle {
    /// Build a bundle whose absolute expiry is `now + expires_in`.
    ///
    /// Returns `None` if that expiry is not a representable timestamp.
    pub fn new(
        access_token: String,
        refresh_token: String,
        expires_in: Option<i64>,
        now: DateTime<Utc>,
    ) -> Option<Self> {
        let expires_in = expires_in
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_EXPIRES_IN_SECS);
        let expires_at = chrono::Duration::try_seconds(expires_in)
            .and_then(|lifetime| now.checked_add_signed(lifetime))?;
        Some(Self {
            access_token,
            refresh_token,
            expires_in,
            expires_at,
        })
    }

    /// Add the three token cookies to `jar`.
    pub fn write_cookies(&self, jar: CookieJar, secure: bool) -> CookieJar {
        jar.add(token_cookie(
            ACCESS_TOKEN_COOKIE,
            self.access_token.clone(),
            self.expires_in,
            secure,
        ))
        .add(token_cookie(
            REFRESH_TOKEN_COOKIE,
            self.refresh_token.clone(),
            REFRESH_TOKEN_MAX_AGE_SECS,
            secure,
        ))
        .add(token_cookie(
            TOKEN_EXPIRY_COOKIE,
            self.expires_at.timestamp_millis().to_string(),
            self.expires_in,
            secure,
        ))
    }
}

impl fmt::Debug for TokenBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenBundle")
            .field("access_token", &preview(&self.access_token))
            .field("refresh_token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Replace every token cookie with an expired one carrying the same attributes.
pub fn clear_cookies(jar: CookieJar, secure: bool) -> CookieJar {
    [ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE, TOKEN_EXPIRY_COOKIE]
        .into_iter()
        .fold(jar, |jar, name| {
            jar.add(token_cookie(name, String::new(), 0, secure))
        })
}

fn token_cookie(
    name: &'static str,
    value: String,
    max_age_secs: i64,
    secure: bool,
) -> Cookie<'static> {
    Cookie::build((name, value))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .secure(secure)
        .max_age(time::Duration::seconds(max_age_secs))
        .build()
}

/// A Google access token known to be present and unexpired.
#[derive(Clone)]
pub struct AccessToken(String);

impl AccessToken {
    /// Read the access token from cookies if it is usable at `now`.
    ///
    /// A token without a parseable expiry is not trusted.
    pub fn from_cookies(jar: &CookieJar, now: DateTime<Utc>) -> Option<Self> {
        let token = jar
            .get(ACCESS_TOKEN_COOKIE)
            .map(|c| c.value().trim().to_string())
            .filter(|v| !v.is_empty())?;

        let expires_at_ms: i64 = jar.get(TOKEN_EXPIRY_COOKIE)?.value().trim().parse().ok()?;

        if now.timestamp_millis() >= expires_at_ms {
            tracing::debug!(expires_at_ms, "Cached access token has expired");
            return None;
        }

        Some(Self(token))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short prefix safe for logs and diagnostics.
    pub fn preview(&self) -> String {
        preview(&self.0)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AccessToken").field(&self.preview()).finish()
    }
}

fn preview(token: &str) -> String {
    let prefix: String = token.chars().take(10).collect();
    format!("{prefix}...")
}
