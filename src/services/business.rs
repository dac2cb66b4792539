// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Google Business Profile API client.
//!
//! Accounts come from the Account Management API, locations from Business
//! Information (falling back to Account Management), and reviews and replies
//! from the legacy v4 API.

use crate::config::GoogleEndpoints;
use crate::error::{AppError, Result};
use crate::models::AccessToken;
use crate::services::fallback::Fallback;
use serde::Deserialize;
use serde_json::Value;

/// Read mask for the second locations probe.
const MINIMAL_LOCATION_READ_MASK: &str = "name,title";

pub const NO_REVIEWS_MESSAGE: &str =
    "No reviews found for this location or reviews access may be restricted";
pub const RESTRICTED_REVIEWS_MESSAGE: &str = "Reviews access is restricted for this location";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AccountsPayload {
    accounts: Vec<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LocationsPayload {
    locations: Vec<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ReviewsPayload {
    reviews: Vec<Value>,
    average_rating: Option<f64>,
    total_review_count: Option<u64>,
    next_page_token: Option<String>,
}

/// Reviews for one location, after status-specific recovery.
#[derive(Debug, Clone, Default)]
pub struct ReviewListing {
    /// Reviews exactly as Google returned them.
    pub reviews: Vec<Value>,
    pub average_rating: Option<f64>,
    pub total_review_count: Option<u64>,
    pub next_page_token: Option<String>,
    /// Set when an error status was downgraded to an empty listing.
    pub message: Option<String>,
    pub url: String,
}

/// Business Profile API client.
#[derive(Clone)]
pub struct BusinessProfileClient {
    http: reqwest::Client,
    endpoints: GoogleEndpoints,
}

impl BusinessProfileClient {
    pub fn new(http: reqwest::Client, endpoints: GoogleEndpoints) -> Self {
        Self { http, endpoints }
    }

    /// List the accounts the token can manage.
    pub async fn list_accounts(&self, token: &AccessToken) -> Result<Vec<Value>> {
        let url = format!("{}/accounts", self.endpoints.account_management);
        let payload: AccountsPayload = self
            .get_json(&url, &[], token, "Failed to fetch accounts")
            .await?;
        tracing::info!(count = payload.accounts.len(), "Fetched business accounts");
        Ok(payload.accounts)
    }

    /// List locations for an account.
    ///
    /// Location listing availability differs between account types, so three
    /// endpoint variants are probed in order: Business Information unfiltered,
    /// Business Information with a minimal read mask, then Account Management.
    pub async fn list_locations(
        &self,
        token: &AccessToken,
        account_name: &str,
    ) -> Result<Vec<Value>> {
        let business_info = format!(
            "{}/{}/locations",
            self.endpoints.business_information, account_name
        );
        let account_mgmt = format!(
            "{}/{}/locations",
            self.endpoints.account_management, account_name
        );
        let context = "Failed to fetch locations";

        let payload: LocationsPayload = Fallback::new("list_locations")
            .or_try("business_information", || {
                self.get_json(&business_info, &[], token, context)
            })
            .or_try("business_information_read_mask", || {
                self.get_json(
                    &business_info,
                    &[("readMask", MINIMAL_LOCATION_READ_MASK)],
                    token,
                    context,
                )
            })
            .or_try("account_management", || {
                self.get_json(&account_mgmt, &[], token, context)
            })
            .run()
            .await?;

        tracing::info!(
            account = %account_name,
            count = payload.locations.len(),
            "Fetched locations"
        );
        Ok(payload.locations)
    }

    /// List reviews under a normalized `accounts/*/locations/*` parent.
    ///
    /// 404 and 403 are not errors: the location simply has no visible
    /// reviews. 401 means the token was revoked and the user must reconnect.
    pub async fn list_reviews(
        &self,
        token: &AccessToken,
        parent: &str,
        page_token: Option<&str>,
    ) -> Result<ReviewListing> {
        let url = format!("{}/{}/reviews", self.endpoints.v4, parent);
        tracing::info!(url = %url, "Fetching reviews");

        let mut request = self.http.get(&url).bearer_auth(token.as_str());
        if let Some(page_token) = page_token {
            request = request.query(&[("pageToken", page_token)]);
        }
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), body = %body, "Reviews API error");

            let message = match status.as_u16() {
                404 => NO_REVIEWS_MESSAGE,
                403 => RESTRICTED_REVIEWS_MESSAGE,
                401 => return Err(AppError::ReauthRequired),
                code => return Err(AppError::upstream("Failed to fetch reviews", code, body)),
            };

            return Ok(ReviewListing {
                message: Some(message.to_string()),
                url,
                ..Default::default()
            });
        }

        let payload: ReviewsPayload = response.json().await?;
        tracing::info!(count = payload.reviews.len(), "Fetched reviews");

        Ok(ReviewListing {
            reviews: payload.reviews,
            average_rating: payload.average_rating,
            total_review_count: payload.total_review_count,
            next_page_token: payload.next_page_token,
            message: None,
            url,
        })
    }

    /// Create or replace the owner reply on a review.
    pub async fn reply_to_review(
        &self,
        token: &AccessToken,
        parent: &str,
        review_id: &str,
        comment: &str,
    ) -> Result<Value> {
        let url = format!(
            "{}/{}/reviews/{}/reply",
            self.endpoints.v4,
            parent,
            urlencoding::encode(review_id)
        );
        tracing::info!(url = %url, "Submitting review reply");

        let response = self
            .http
            .put(&url)
            .bearer_auth(token.as_str())
            .json(&serde_json::json!({ "comment": comment }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), body = %body, "Reply API error");
            return Err(match status.as_u16() {
                401 => AppError::ReauthRequired,
                404 => AppError::NotFound(format!("Review not found: {review_id}")),
                code => AppError::upstream("Failed to submit reply", code, body),
            });
        }

        Ok(response.json().await?)
    }

    /// Generic GET with bearer auth, JSON body on success, status passthrough
    /// on failure.
    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        query: &[(&str, &str)],
        token: &AccessToken,
        context: &str,
    ) -> Result<T> {
        let response = self
            .http
            .get(url)
            .bearer_auth(token.as_str())
            .query(query)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!(url = %url, status = status.as_u16(), "Google API response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::upstream(context, status.as_u16(), body));
        }

        Ok(response.json().await?)
    }
}
