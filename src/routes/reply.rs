// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Review reply submission.

use crate::error::{AppError, Result};
use crate::models::{review_parent, AccessToken};
use crate::routes::business::{required_param, resource_param};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    routing::put,
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Longest reply Google accepts.
pub const MAX_REPLY_CHARS: usize = 4096;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/google-business-reply", put(submit_reply))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyRequest {
    #[serde(default)]
    review_id: Option<String>,
    #[serde(default)]
    comment: Option<String>,
    #[serde(default)]
    account_name: Option<String>,
    #[serde(default)]
    location_name: Option<String>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ReplyResponse {
    pub success: bool,
    #[cfg_attr(feature = "binding-generation", ts(type = "unknown"))]
    pub reply: Value,
}

/// Post (or replace) the owner reply on one review.
async fn submit_reply(
    State(state): State<Arc<AppState>>,
    Extension(token): Extension<AccessToken>,
    body: std::result::Result<Json<ReplyRequest>, JsonRejection>,
) -> Result<Json<ReplyResponse>> {
    let Json(request) =
        body.map_err(|e| AppError::BadRequest(format!("Invalid reply payload: {e}")))?;

    let review_id = resource_param(request.review_id.as_deref(), "reviewId", "replies")?;
    let account = resource_param(request.account_name.as_deref(), "accountName", "replies")?;
    let location = resource_param(request.location_name.as_deref(), "locationName", "replies")?;
    let comment = required_param(request.comment.as_deref(), "comment", "replies")?;

    if comment.chars().count() > MAX_REPLY_CHARS {
        return Err(AppError::BadRequest(format!(
            "comment must be at most {MAX_REPLY_CHARS} characters"
        )));
    }

    let parent = review_parent(account, location);
    tracing::info!(parent = %parent, review_id = %review_id, "Replying to review");

    let reply = state
        .business
        .reply_to_review(&token, &parent, review_id, comment)
        .await?;

    Ok(Json(ReplyResponse {
        success: true,
        reply,
    }))
}
