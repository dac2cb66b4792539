// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Filtered, paginated review view for the web client.

use crate::error::{AppError, Result};
use crate::models::review::{
    paginate, GoogleReview, ReplyFilter, Review, ReviewFilter, SentimentFilter, DEFAULT_PER_PAGE,
};
use crate::models::{review_parent, AccessToken};
use crate::routes::business::resource_param;
use crate::AppState;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/reviews", get(get_reviews))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewsQuery {
    account_name: Option<String>,
    location_name: Option<String>,
    #[serde(default)]
    search: Option<String>,
    #[serde(default)]
    sentiment: SentimentFilter,
    #[serde(default)]
    replied: ReplyFilter,
    #[serde(default = "default_page")]
    page: u32,
    #[serde(default = "default_per_page")]
    per_page: u32,
}

fn default_page() -> u32 {
    1
}
fn default_per_page() -> u32 {
    DEFAULT_PER_PAGE
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ReviewViewResponse {
    pub reviews: Vec<Review>,
    /// Reviews matching the filters.
    pub total: usize,
    /// Reviews fetched before filtering.
    pub unfiltered_total: usize,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Fetch a location's reviews and return one filtered page.
async fn get_reviews(
    State(state): State<Arc<AppState>>,
    Extension(token): Extension<AccessToken>,
    params: std::result::Result<Query<ReviewsQuery>, QueryRejection>,
) -> Result<Json<ReviewViewResponse>> {
    let Query(params) =
        params.map_err(|e| AppError::BadRequest(format!("Invalid query: {e}")))?;

    if params.page < 1 {
        return Err(AppError::BadRequest(
            "Page must be greater than 0".to_string(),
        ));
    }

    let location = resource_param(params.location_name.as_deref(), "locationName", "reviews")?;
    let account = resource_param(params.account_name.as_deref(), "accountName", "reviews")?;
    let parent = review_parent(account, location);

    let listing = state.business.list_reviews(&token, &parent, None).await?;

    let reviews: Vec<Review> = listing
        .reviews
        .into_iter()
        .filter_map(|raw| match serde_json::from_value::<GoogleReview>(raw) {
            Ok(review) => Some(Review::from(review)),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping malformed review");
                None
            }
        })
        .collect();
    let unfiltered_total = reviews.len();

    let filter = ReviewFilter {
        search: params.search,
        sentiment: params.sentiment,
        replied: params.replied,
    };
    let page = paginate(filter.apply(reviews), params.page, params.per_page);

    tracing::debug!(
        parent = %parent,
        unfiltered_total,
        total = page.total,
        page = page.page,
        "Built review view"
    );

    Ok(Json(ReviewViewResponse {
        reviews: page.reviews,
        total: page.total,
        unfiltered_total,
        page: page.page,
        per_page: page.per_page,
        total_pages: page.total_pages,
        message: listing.message,
    }))
}
