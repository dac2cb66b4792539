// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Business Profile proxy tests.
//!
//! These tests verify that:
//! 1. Every operation is gated on a valid, unexpired token cookie
//! 2. Locations probing falls back in order and stops at the first success
//! 3. Reviews recover from 404/403 and surface 401 as a reconnect error

use axum::{
    extract::{Path, Query},
    http::{header, StatusCode},
    routing::get,
    Router,
};
use serde_json::json;
use std::collections::HashMap;
use tower::ServiceExt;

mod common;

use common::{body_json, get_with_cookie, json_reply, valid_token_cookie};

async fn call(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let cookie = valid_token_cookie();
    let response = app.oneshot(get_with_cookie(uri, Some(&cookie))).await.unwrap();
    let status = response.status();
    (status, body_json(response).await)
}

#[tokio::test]
async fn test_every_type_requires_token() {
    let fake = common::spawn_fake_google(Router::new()).await;
    let app = common::create_test_app(&fake);

    for kind in [
        "debug",
        "accounts",
        "locations&accountName=accounts/1",
        "reviews&accountName=accounts/1&locationName=locations/2",
        "connection-status",
        "bogus",
    ] {
        for cookie in [None, Some(common::expired_token_cookie())] {
            let response = app
                .clone()
                .oneshot(get_with_cookie(
                    &format!("/api/business?type={kind}"),
                    cookie.as_deref(),
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "type={kind}");
        }
    }

    assert!(fake.requests().is_empty(), "no Google call without a token");
}

#[tokio::test]
async fn test_connection_status() {
    let fake = common::spawn_fake_google(Router::new()).await;
    let app = common::create_test_app(&fake);

    let (status, body) = call(app.clone(), "/api/business?type=connection-status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["connected"], true);

    let expired = common::expired_token_cookie();
    let response = app
        .oneshot(get_with_cookie(
            "/api/business?type=connection-status",
            Some(&expired),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["connected"], false);
    assert!(body["error"].as_str().unwrap().contains("not connected"));
}

#[tokio::test]
async fn test_invalid_type_lists_valid_selectors() {
    let fake = common::spawn_fake_google(Router::new()).await;
    let app = common::create_test_app(&fake);

    for uri in ["/api/business?type=nope", "/api/business"] {
        let (status, body) = call(app.clone(), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .contains("debug, accounts, locations, reviews, or connection-status"));
    }
}

#[tokio::test]
async fn test_path_escaping_resource_names_rejected() {
    let fake = common::spawn_fake_google(Router::new()).await;
    let app = common::create_test_app(&fake);

    for uri in [
        "/api/business?type=locations&accountName=accounts/1/../../..",
        "/api/business?type=locations&accountName=accounts/1%3Falt%3Dmedia",
        "/api/business?type=reviews&accountName=accounts/1&locationName=locations/2%23x",
        "/api/business?type=reviews&accountName=accounts/1&locationName=../../v1/accounts",
        "/api/reviews?accountName=accounts/1/%252e%252e&locationName=locations/2",
    ] {
        let (status, body) = call(app.clone(), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert!(body["error"]
            .as_str()
            .unwrap()
            .contains("is not a valid resource name"));
    }

    assert!(fake.requests().is_empty());
}

#[tokio::test]
async fn test_accounts_passthrough() {
    let fake = common::spawn_fake_google(Router::new().route(
        "/accountmanagement/v1/accounts",
        get(|headers: axum::http::HeaderMap| async move {
            assert_eq!(
                headers.get(header::AUTHORIZATION).unwrap(),
                "Bearer ya29.test-access-token"
            );
            json_reply(
                StatusCode::OK,
                json!({"accounts": [
                    {"name": "accounts/1", "accountName": "Cafe", "type": "PERSONAL"},
                    {"name": "accounts/2", "accountName": "Bakery", "type": "LOCATION_GROUP"}
                ]}),
            )
        }),
    ))
    .await;

    let (status, body) = call(common::create_test_app(&fake), "/api/business?type=accounts").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
    assert_eq!(body["accounts"][1]["accountName"], "Bakery");
    assert_eq!(body["accounts"][0]["type"], "PERSONAL");
}

#[tokio::test]
async fn test_accounts_empty_payload() {
    let fake = common::spawn_fake_google(Router::new().route(
        "/accountmanagement/v1/accounts",
        get(|| async { json_reply(StatusCode::OK, json!({})) }),
    ))
    .await;

    let (status, body) = call(common::create_test_app(&fake), "/api/business?type=accounts").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 0);
    assert_eq!(body["accounts"], json!([]));
}

#[tokio::test]
async fn test_accounts_failure_propagates_status() {
    let fake = common::spawn_fake_google(Router::new().route(
        "/accountmanagement/v1/accounts",
        get(|| async {
            json_reply(
                StatusCode::FORBIDDEN,
                json!({"error": {"status": "PERMISSION_DENIED"}}),
            )
        }),
    ))
    .await;

    let (status, body) = call(common::create_test_app(&fake), "/api/business?type=accounts").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let error = body["error"].as_str().unwrap();
    assert!(error.starts_with("Failed to fetch accounts: 403"));
    assert!(error.contains("PERMISSION_DENIED"));
}

#[tokio::test]
async fn test_locations_requires_account() {
    let fake = common::spawn_fake_google(Router::new()).await;
    let (status, body) = call(common::create_test_app(&fake), "/api/business?type=locations").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "accountName is required for locations");
    assert!(fake.requests().is_empty());
}

#[tokio::test]
async fn test_locations_first_endpoint_wins() {
    let fake = common::spawn_fake_google(Router::new().route(
        "/businessinformation/v1/accounts/{id}/locations",
        get(|| async {
            json_reply(
                StatusCode::OK,
                json!({"locations": [{"name": "locations/10", "title": "Main St"}]}),
            )
        }),
    ))
    .await;

    let (status, body) = call(
        common::create_test_app(&fake),
        "/api/business?type=locations&accountName=accounts/7",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(
        fake.requests(),
        vec!["GET /businessinformation/v1/accounts/7/locations".to_string()]
    );
}

#[tokio::test]
async fn test_locations_falls_back_to_read_mask() {
    let fake = common::spawn_fake_google(Router::new().route(
        "/businessinformation/v1/accounts/{id}/locations",
        get(|Query(q): Query<HashMap<String, String>>| async move {
            match q.get("readMask").map(String::as_str) {
                Some("name,title") => json_reply(
                    StatusCode::OK,
                    json!({"locations": [
                        {"name": "locations/10", "title": "Main St"},
                        {"name": "locations/11", "title": "Harbor"}
                    ]}),
                ),
                _ => json_reply(
                    StatusCode::BAD_REQUEST,
                    json!({"error": {"message": "read_mask is required"}}),
                ),
            }
        }),
    ))
    .await;

    let (status, body) = call(
        common::create_test_app(&fake),
        "/api/business?type=locations&accountName=accounts/7",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
    assert_eq!(body["locations"][1]["title"], "Harbor");
    assert!(body.get("error").is_none());

    let requests = fake.requests();
    assert_eq!(requests.len(), 2, "{requests:?}");
    assert_eq!(requests[0], "GET /businessinformation/v1/accounts/7/locations");
    assert!(requests[1].contains("readMask=name%2Ctitle"));
}

#[tokio::test]
async fn test_locations_falls_back_to_account_management() {
    let fake = common::spawn_fake_google(
        Router::new()
            .route(
                "/businessinformation/v1/accounts/{id}/locations",
                get(|| async { json_reply(StatusCode::FORBIDDEN, json!({"error": "forbidden"})) }),
            )
            .route(
                "/accountmanagement/v1/accounts/{id}/locations",
                get(|| async {
                    json_reply(
                        StatusCode::OK,
                        json!({"locations": [{"name": "accounts/7/locations/3"}]}),
                    )
                }),
            ),
    )
    .await;

    let (status, body) = call(
        common::create_test_app(&fake),
        "/api/business?type=locations&accountName=accounts/7",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["locations"][0]["name"], "accounts/7/locations/3");
    assert_eq!(fake.requests().len(), 3);
}

#[tokio::test]
async fn test_locations_all_fail_reports_last() {
    let fake = common::spawn_fake_google(
        Router::new()
            .route(
                "/businessinformation/v1/accounts/{id}/locations",
                get(|| async { json_reply(StatusCode::FORBIDDEN, json!({"error": "first"})) }),
            )
            .route(
                "/accountmanagement/v1/accounts/{id}/locations",
                get(|| async {
                    json_reply(StatusCode::NOT_IMPLEMENTED, json!({"error": "last"}))
                }),
            ),
    )
    .await;

    let (status, body) = call(
        common::create_test_app(&fake),
        "/api/business?type=locations&accountName=accounts/7",
    )
    .await;

    assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
    let error = body["error"].as_str().unwrap();
    assert!(error.starts_with("Failed to fetch locations: 501"));
    assert!(error.contains("last"));
}

fn reviews_fake(status: StatusCode, body: serde_json::Value) -> Router {
    Router::new().route(
        "/v4/accounts/{account}/locations/{location}/reviews",
        get(move |Path((account, location)): Path<(String, String)>| {
            let body = body.clone();
            async move {
                assert_eq!(account, "7");
                assert_eq!(location, "3");
                json_reply(status, body)
            }
        }),
    )
}

#[tokio::test]
async fn test_reviews_requires_location_and_account() {
    let fake = common::spawn_fake_google(Router::new()).await;
    let app = common::create_test_app(&fake);

    let (status, body) = call(app.clone(), "/api/business?type=reviews&accountName=accounts/7").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "locationName is required for reviews");

    let (status, body) = call(app, "/api/business?type=reviews&locationName=locations/3").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "accountName is required for reviews");
}

#[tokio::test]
async fn test_reviews_success_normalizes_parent() {
    let fake = common::spawn_fake_google(reviews_fake(
        StatusCode::OK,
        json!({
            "reviews": [{"reviewId": "r1", "starRating": "FIVE"}],
            "averageRating": 5.0,
            "totalReviewCount": 1
        }),
    ))
    .await;
    let app = common::create_test_app(&fake);

    for (account, location) in [
        ("accounts/7", "locations/3"),
        ("7", "3"),
        ("accounts/99", "accounts/7/locations/3"),
    ] {
        let (status, body) = call(
            app.clone(),
            &format!("/api/business?type=reviews&accountName={account}&locationName={location}"),
        )
        .await;

        assert_eq!(status, StatusCode::OK, "{account} {location}");
        assert_eq!(body["parentPath"], "accounts/7/locations/3");
        assert_eq!(body["total"], 1);
        assert_eq!(body["reviews"][0]["reviewId"], "r1");
        assert_eq!(body["totalReviewCount"], 1);
        assert!(body["url"]
            .as_str()
            .unwrap()
            .ends_with("/v4/accounts/7/locations/3/reviews"));
    }
}

#[tokio::test]
async fn test_reviews_404_is_empty_list() {
    let fake = common::spawn_fake_google(reviews_fake(
        StatusCode::NOT_FOUND,
        json!({"error": {"code": 404}}),
    ))
    .await;

    let (status, body) = call(
        common::create_test_app(&fake),
        "/api/business?type=reviews&accountName=accounts/7&locationName=locations/3",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reviews"], json!([]));
    assert_eq!(body["total"], 0);
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn test_reviews_403_is_empty_list_with_message() {
    let fake = common::spawn_fake_google(reviews_fake(
        StatusCode::FORBIDDEN,
        json!({"error": {"code": 403}}),
    ))
    .await;

    let (status, body) = call(
        common::create_test_app(&fake),
        "/api/business?type=reviews&accountName=accounts/7&locationName=locations/3",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reviews"], json!([]));
    assert_eq!(body["message"], "Reviews access is restricted for this location");
}

#[tokio::test]
async fn test_reviews_401_requires_reconnect() {
    let fake = common::spawn_fake_google(reviews_fake(
        StatusCode::UNAUTHORIZED,
        json!({"error": {"code": 401}}),
    ))
    .await;

    let (status, body) = call(
        common::create_test_app(&fake),
        "/api/business?type=reviews&accountName=accounts/7&locationName=locations/3",
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].as_str().unwrap().contains("reconnect"));
}

#[tokio::test]
async fn test_reviews_other_failure_passes_through() {
    let fake = common::spawn_fake_google(reviews_fake(
        StatusCode::SERVICE_UNAVAILABLE,
        json!({"error": "backend down"}),
    ))
    .await;

    let (status, body) = call(
        common::create_test_app(&fake),
        "/api/business?type=reviews&accountName=accounts/7&locationName=locations/3",
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    let error = body["error"].as_str().unwrap();
    assert!(error.starts_with("Failed to fetch reviews: 503"));
    assert!(error.contains("backend down"));
}

#[tokio::test]
async fn test_reviews_forwards_page_token() {
    let fake = common::spawn_fake_google(Router::new().route(
        "/v4/accounts/{account}/locations/{location}/reviews",
        get(|Query(q): Query<HashMap<String, String>>| async move {
            assert_eq!(q.get("pageToken").map(String::as_str), Some("next-1"));
            json_reply(
                StatusCode::OK,
                json!({"reviews": [], "nextPageToken": "next-2"}),
            )
        }),
    ))
    .await;

    let (status, body) = call(
        common::create_test_app(&fake),
        "/api/business?type=reviews&accountName=7&locationName=3&pageToken=next-1",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["nextPageToken"], "next-2");
}

#[tokio::test]
async fn test_debug_reports_token_info() {
    let fake = common::spawn_fake_google(Router::new().route(
        "/oauth2/v1/tokeninfo",
        get(|Query(q): Query<HashMap<String, String>>| async move {
            assert_eq!(q.get("access_token").unwrap(), "ya29.test-access-token");
            json_reply(
                StatusCode::OK,
                json!({"scope": "https://www.googleapis.com/auth/business.manage", "expires_in": 3000}),
            )
        }),
    ))
    .await;

    let (status, body) = call(common::create_test_app(&fake), "/api/business?type=debug").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["connectionStatus"], "connected");
    assert_eq!(body["accessToken"], "ya29.test-...");
    assert_eq!(body["tokenInfo"]["expires_in"], 3000);
}

#[tokio::test]
async fn test_debug_invalid_token() {
    let fake = common::spawn_fake_google(Router::new().route(
        "/oauth2/v1/tokeninfo",
        get(|| async { json_reply(StatusCode::BAD_REQUEST, json!({"error": "invalid_token"})) }),
    ))
    .await;

    let (status, body) = call(common::create_test_app(&fake), "/api/business?type=debug").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["connectionStatus"], "invalid_token");
    assert_eq!(body["status"], 400);
}

#[tokio::test]
async fn test_unreachable_google_is_500() {
    // Nothing listens on the discard port.
    let app = common::create_test_app_with(common::config_for("http://127.0.0.1:9")).0;

    let (status, body) = call(app, "/api/business?type=accounts").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to fetch business data");
    assert!(body["details"].is_string());
}
