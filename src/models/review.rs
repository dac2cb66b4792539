// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Customer reviews as returned by the v4 API, and the flattened view model
//! the web client renders.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Default number of review cards per page.
pub const DEFAULT_PER_PAGE: u32 = 10;
pub const MAX_PER_PAGE: u32 = 50;

/// Review as returned by `accounts/*/locations/*/reviews`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GoogleReview {
    pub review_id: String,
    pub name: String,
    pub reviewer: Reviewer,
    pub star_rating: String,
    pub comment: String,
    pub create_time: String,
    pub update_time: String,
    pub review_reply: Option<ReviewReply>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Reviewer {
    pub display_name: String,
    pub profile_photo_url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReviewReply {
    pub comment: String,
    pub update_time: String,
}

/// Map a `starRating` enum string to 1..=5, or 0 when unrecognized.
pub fn star_rating_value(star_rating: &str) -> u8 {
    match star_rating.trim().to_ascii_uppercase().as_str() {
        "ONE" => 1,
        "TWO" => 2,
        "THREE" => 3,
        "FOUR" => 4,
        "FIVE" => 5,
        _ => 0,
    }
}

/// Flattened review for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Review {
    pub id: String,
    pub customer_name: String,
    pub customer_avatar: String,
    pub review_date: String,
    pub rating: u8,
    pub comment: String,
    pub is_replied: bool,
    pub reply_date: Option<String>,
    pub reply: String,
}

impl From<GoogleReview> for Review {
    fn from(review: GoogleReview) -> Self {
        let rating = star_rating_value(&review.star_rating);
        let (is_replied, reply_date, reply) = match review.review_reply {
            Some(r) => (true, Some(r.update_time), r.comment),
            None => (false, None, String::new()),
        };

        Self {
            id: review.review_id,
            customer_name: review.reviewer.display_name,
            customer_avatar: review.reviewer.profile_photo_url,
            review_date: review.create_time,
            rating,
            comment: review.comment,
            is_replied,
            reply_date,
            reply,
        }
    }
}

impl Review {
    /// Positive means four stars or more; everything else counts as negative.
    pub fn sentiment(&self) -> Sentiment {
        if self.rating >= 4 {
            Sentiment::Positive
        } else {
            Sentiment::Negative
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentiment {
    Positive,
    Negative,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentFilter {
    #[default]
    All,
    Positive,
    Negative,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyFilter {
    #[default]
    All,
    Replied,
    Unreplied,
}

/// Independent predicates applied together.
#[derive(Debug, Clone, Default)]
pub struct ReviewFilter {
    pub search: Option<String>,
    pub sentiment: SentimentFilter,
    pub replied: ReplyFilter,
}

impl ReviewFilter {
    pub fn matches(&self, review: &Review) -> bool {
        self.matches_search(review) && self.matches_sentiment(review) && self.matches_reply(review)
    }

    fn matches_search(&self, review: &Review) -> bool {
        let term = match self.search.as_deref() {
            Some(term) if !term.is_empty() => term.to_lowercase(),
            _ => return true,
        };
        review.customer_name.to_lowercase().contains(&term)
            || review.comment.to_lowercase().contains(&term)
    }

    fn matches_sentiment(&self, review: &Review) -> bool {
        match self.sentiment {
            SentimentFilter::All => true,
            SentimentFilter::Positive => review.sentiment() == Sentiment::Positive,
            SentimentFilter::Negative => review.sentiment() == Sentiment::Negative,
        }
    }

    fn matches_reply(&self, review: &Review) -> bool {
        match self.replied {
            ReplyFilter::All => true,
            ReplyFilter::Replied => review.is_replied,
            ReplyFilter::Unreplied => !review.is_replied,
        }
    }

    pub fn apply(&self, reviews: Vec<Review>) -> Vec<Review> {
        reviews.into_iter().filter(|r| self.matches(r)).collect()
    }
}

/// One page of filtered reviews.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewPage {
    pub reviews: Vec<Review>,
    pub total: usize,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u32,
}

/// Slice `reviews` into 1-based pages of `per_page` items.
///
/// `per_page` is clamped to `1..=MAX_PER_PAGE`; pages past the end are empty.
pub fn paginate(reviews: Vec<Review>, page: u32, per_page: u32) -> ReviewPage {
    let per_page = per_page.clamp(1, MAX_PER_PAGE);
    let page = page.max(1);
    let total = reviews.len();
    let total_pages = total.div_ceil(per_page as usize) as u32;

    let start = (page as usize - 1).saturating_mul(per_page as usize);
    let reviews = reviews
        .into_iter()
        .skip(start)
        .take(per_page as usize)
        .collect();

    ReviewPage {
        reviews,
        total,
        page,
        per_page,
        total_pages,
    }
}
