// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Everything is read once at startup. Missing OAuth settings do not stop the
//! server; the validation outcome is kept and surfaced per request as a
//! configuration error.

use std::env;

/// Google OAuth endpoints and Business Profile API bases.
///
/// Overridable so tests can point the service at a local fake.
#[derive(Debug, Clone)]
pub struct GoogleEndpoints {
    pub auth_url: String,
    pub token_url: String,
    pub tokeninfo_url: String,
    pub account_management: String,
    pub business_information: String,
    pub v4: String,
}

impl Default for GoogleEndpoints {
    fn default() -> Self {
        Self {
            auth_url: "https://accounts.google.com/o/oauth2/v2/auth".to_string(),
            token_url: "https://oauth2.googleapis.com/token".to_string(),
            tokeninfo_url: "https://www.googleapis.com/oauth2/v1/tokeninfo".to_string(),
            account_management: "https://mybusinessaccountmanagement.googleapis.com/v1"
                .to_string(),
            business_information: "https://mybusinessbusinessinformation.googleapis.com/v1"
                .to_string(),
            v4: "https://mybusiness.googleapis.com/v4".to_string(),
        }
    }
}

impl GoogleEndpoints {
    /// Point every endpoint at one base URL (the test fake serves them all).
    pub fn with_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            auth_url: format!("{base}/o/oauth2/v2/auth"),
            token_url: format!("{base}/token"),
            tokeninfo_url: format!("{base}/oauth2/v1/tokeninfo"),
            account_management: format!("{base}/accountmanagement/v1"),
            business_information: format!("{base}/businessinformation/v1"),
            v4: format!("{base}/v4"),
        }
    }

    fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            auth_url: env_or("GOOGLE_AUTH_URL", defaults.auth_url),
            token_url: env_or("GOOGLE_TOKEN_URL", defaults.token_url),
            tokeninfo_url: env_or("GOOGLE_TOKENINFO_URL", defaults.tokeninfo_url),
            account_management: env_or("GBP_ACCOUNT_MANAGEMENT_URL", defaults.account_management),
            business_information: env_or(
                "GBP_BUSINESS_INFORMATION_URL",
                defaults.business_information,
            ),
            v4: env_or("GBP_V4_URL", defaults.v4),
        }
    }
}

/// OAuth client credentials, complete and validated.
#[derive(Debug, Clone)]
pub struct OAuthCredentials {
    pub client_id: String,
    pub client_secret: String,
    /// Must match the redirect URI registered with Google exactly.
    pub redirect_uri: String,
    /// Application root that callback outcomes redirect to.
    pub app_base_url: String,
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// OAuth settings, or the reason they are unusable.
    pub oauth: Result<OAuthCredentials, ConfigError>,
    /// Server port
    pub port: u16,
    /// Whether token cookies carry the `Secure` attribute.
    pub secure_cookies: bool,
    /// Origin allowed by CORS besides localhost.
    pub app_origin: String,
    pub endpoints: GoogleEndpoints,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok(); // Load .env file if present

        let oauth = load_oauth();
        let app_origin = env::var("APP_BASE_URL")
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .unwrap_or_else(|_| "http://localhost:3000".to_string());

        let secure_cookies = match env::var("COOKIE_SECURE") {
            Ok(v) => matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"),
            Err(_) => app_origin.starts_with("https://"),
        };

        Self {
            oauth,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            secure_cookies,
            app_origin,
            endpoints: GoogleEndpoints::from_env(),
        }
    }

    /// Complete configuration for tests, talking to real Google endpoints.
    pub fn test_default() -> Self {
        Self {
            oauth: Ok(OAuthCredentials {
                client_id: "test_client_id".to_string(),
                client_secret: "test_secret".to_string(),
                redirect_uri: "http://localhost:3000/api/auth/callback".to_string(),
                app_base_url: "http://localhost:3000".to_string(),
            }),
            port: 8080,
            secure_cookies: false,
            app_origin: "http://localhost:3000".to_string(),
            endpoints: GoogleEndpoints::default(),
        }
    }

    /// OAuth credentials, or the configuration error recorded at startup.
    pub fn oauth(&self) -> Result<&OAuthCredentials, ConfigError> {
        self.oauth.as_ref().map_err(Clone::clone)
    }
}

fn load_oauth() -> Result<OAuthCredentials, ConfigError> {
    Ok(OAuthCredentials {
        client_id: required("GOOGLE_CLIENT_ID")?,
        client_secret: required("GOOGLE_CLIENT_SECRET")?,
        redirect_uri: required("GOOGLE_REDIRECT_URI")?,
        app_base_url: required("APP_BASE_URL")?
            .trim_end_matches('/')
            .to_string(),
    })
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .map(|v| v.trim().to_string())
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing(name))
}

fn env_or(name: &str, default: String) -> String {
    env::var(name)
        .ok()
        .map(|v| v.trim().trim_end_matches('/').to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
}

/// Configuration errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
