// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Google Business Profile resource names.

/// Build the `accounts/{a}/locations/{l}` parent path the v4 API expects.
///
/// Location names arrive in one of three shapes depending on which API
/// produced them:
/// - already qualified: `accounts/1/locations/2`
/// - location only: `locations/2`
/// - bare id: `2`
///
/// The account name may be given with or without its `accounts/` prefix.
pub fn review_parent(account_name: &str, location_name: &str) -> String {
    let location = location_name.trim();

    if location.contains("accounts/") && location.contains("locations/") {
        return location.to_string();
    }

    let account = qualified_account(account_name.trim());
    if location.starts_with("locations/") {
        format!("{account}/{location}")
    } else {
        format!("{account}/locations/{location}")
    }
}

/// Whether `name` can be placed in a URL path without changing which
/// resource the path points at.
///
/// Dot segments (plain or percent-encoded) are resolved by URL parsing, and
/// `?`, `#` and `\` end or split the path.
pub fn is_path_safe(name: &str) -> bool {
    !name.contains("..") && !name.contains(['?', '#', '%', '\\'])
}

fn qualified_account(account_name: &str) -> String {
    if account_name.starts_with("accounts/") {
        account_name.to_string()
    } else {
        format!("accounts/{account_name}")
    }
}
