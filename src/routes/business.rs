// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Business Profile proxy routes.

use crate::error::{AppError, Result};
use crate::models::resource::is_path_safe;
use crate::models::{review_parent, AccessToken};
use crate::services::TokenInfo;
use crate::AppState;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::get,
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Proxy routes (require a Google token cookie).
/// The token middleware is applied in routes/mod.rs.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/business", get(business))
}

/// Operation selected by the `type` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusinessOperation {
    Debug,
    Accounts,
    Locations,
    Reviews,
    ConnectionStatus,
}

impl FromStr for BusinessOperation {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "debug" => Ok(Self::Debug),
            "accounts" => Ok(Self::Accounts),
            "locations" => Ok(Self::Locations),
            "reviews" => Ok(Self::Reviews),
            "connection-status" => Ok(Self::ConnectionStatus),
            _ => Err(AppError::BadRequest(
                "Invalid type parameter. Use: debug, accounts, locations, reviews, or connection-status"
                    .to_string(),
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessQuery {
    #[serde(rename = "type")]
    kind: Option<String>,
    account_name: Option<String>,
    location_name: Option<String>,
    page_token: Option<String>,
}

/// Return the named parameter if present and non-blank.
pub(crate) fn required_param<'a>(
    value: Option<&'a str>,
    name: &str,
    purpose: &str,
) -> Result<&'a str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::BadRequest(format!("{name} is required for {purpose}")))
}

/// Like [`required_param`], for values that end up in a Google URL path.
pub(crate) fn resource_param<'a>(
    value: Option<&'a str>,
    name: &str,
    purpose: &str,
) -> Result<&'a str> {
    let value = required_param(value, name, purpose)?;
    if !is_path_safe(value) {
        return Err(AppError::BadRequest(format!(
            "{name} is not a valid resource name"
        )));
    }
    Ok(value)
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AccountsResponse {
    #[cfg_attr(feature = "binding-generation", ts(type = "Array<unknown>"))]
    pub accounts: Vec<Value>,
    pub total: usize,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LocationsResponse {
    #[cfg_attr(feature = "binding-generation", ts(type = "Array<unknown>"))]
    pub locations: Vec<Value>,
    pub total: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ReviewsResponse {
    #[cfg_attr(feature = "binding-generation", ts(type = "Array<unknown>"))]
    pub reviews: Vec<Value>,
    pub total: usize,
    pub parent_path: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_review_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ConnectionStatusResponse {
    pub connected: bool,
}

/// Dispatch one Business Profile operation.
async fn business(
    State(state): State<Arc<AppState>>,
    Extension(token): Extension<AccessToken>,
    Query(params): Query<BusinessQuery>,
) -> Result<Response> {
    tracing::info!(
        kind = ?params.kind,
        account = ?params.account_name,
        location = ?params.location_name,
        "Business API called"
    );

    let operation: BusinessOperation = params.kind.as_deref().unwrap_or_default().parse()?;

    match operation {
        BusinessOperation::Debug => debug_token(&state, &token).await,
        BusinessOperation::Accounts => {
            let accounts = state.business.list_accounts(&token).await?;
            Ok(Json(AccountsResponse {
                total: accounts.len(),
                accounts,
            })
            .into_response())
        }
        BusinessOperation::Locations => {
            let account =
                resource_param(params.account_name.as_deref(), "accountName", "locations")?;
            let locations = state.business.list_locations(&token, account).await?;
            Ok(Json(LocationsResponse {
                total: locations.len(),
                locations,
            })
            .into_response())
        }
        BusinessOperation::Reviews => {
            let location =
                resource_param(params.location_name.as_deref(), "locationName", "reviews")?;
            let account = resource_param(params.account_name.as_deref(), "accountName", "reviews")?;

            let parent = review_parent(account, location);
            tracing::debug!(parent = %parent, "Resolved reviews parent path");

            let listing = state
                .business
                .list_reviews(&token, &parent, params.page_token.as_deref())
                .await?;

            Ok(Json(ReviewsResponse {
                total: listing.reviews.len(),
                reviews: listing.reviews,
                parent_path: parent,
                url: listing.url,
                average_rating: listing.average_rating,
                total_review_count: listing.total_review_count,
                next_page_token: listing.next_page_token,
                message: listing.message,
            })
            .into_response())
        }
        // The token middleware already rejected requests without a valid token.
        BusinessOperation::ConnectionStatus => {
            Ok(Json(ConnectionStatusResponse { connected: true }).into_response())
        }
    }
}

/// Diagnostic: token introspection plus a truncated token preview.
async fn debug_token(state: &AppState, token: &AccessToken) -> Result<Response> {
    let body = match state.oauth.token_info(token).await? {
        TokenInfo::Valid(info) => serde_json::json!({
            "tokenInfo": info,
            "accessToken": token.preview(),
            "connectionStatus": "connected",
        }),
        TokenInfo::Invalid { status, details } => serde_json::json!({
            "error": "Failed to get token info",
            "status": status,
            "details": details,
            "connectionStatus": "invalid_token",
        }),
    };
    Ok(Json(body).into_response())
}
