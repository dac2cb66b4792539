// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! gbp-reviews API Server
//!
//! Connects a Google Business Profile account and serves its locations,
//! reviews, and replies to the web client.

use gbp_reviews::{config::Config, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging()?;

    // Load configuration from environment
    let config = Config::from_env();
    match config.oauth() {
        Ok(oauth) => tracing::info!(
            client_id = %oauth.client_id,
            redirect_uri = %oauth.redirect_uri,
            "Google OAuth configured"
        ),
        Err(e) => tracing::error!(
            error = %e,
            "Google OAuth is not configured; auth endpoints will return errors"
        ),
    }
    tracing::info!(
        port = config.port,
        secure_cookies = config.secure_cookies,
        "Starting gbp-reviews API"
    );

    let port = config.port;
    let state = Arc::new(AppState::new(config));

    // Build router
    let app = gbp_reviews::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("gbp_reviews=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
