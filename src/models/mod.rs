// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod resource;
pub mod review;
pub mod token;

pub use resource::review_parent;
pub use review::{paginate, star_rating_value, GoogleReview, Review, ReviewFilter, ReviewPage};
pub use token::{AccessToken, TokenBundle};
