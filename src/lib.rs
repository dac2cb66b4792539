// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! gbp-reviews: reply to Google Business Profile reviews.
//!
//! This crate provides the backend API that connects a Google account via
//! OAuth2 and proxies the Business Profile APIs for accounts, locations,
//! reviews, and replies.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use services::{BusinessProfileClient, GoogleOAuthClient};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub oauth: GoogleOAuthClient,
    pub business: BusinessProfileClient,
}

impl AppState {
    /// Build the Google clients around one shared HTTP connection pool.
    pub fn new(config: Config) -> Self {
        let http = reqwest::Client::new();
        Self {
            oauth: GoogleOAuthClient::new(http.clone(), config.endpoints.clone()),
            business: BusinessProfileClient::new(http, config.endpoints.clone()),
            config,
        }
    }
}
