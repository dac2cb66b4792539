// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - Google API clients.

pub mod business;
pub mod fallback;
pub mod google_oauth;

pub use business::{BusinessProfileClient, ReviewListing};
pub use fallback::Fallback;
pub use google_oauth::{GoogleOAuthClient, TokenExchangeError, TokenInfo};
