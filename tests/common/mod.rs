// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{
    body::Body,
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
    Router,
};
use gbp_reviews::config::{Config, GoogleEndpoints};
use gbp_reviews::routes::create_router;
use gbp_reviews::AppState;
use serde_json::Value;
use std::sync::{Arc, Mutex};

/// In-process stand-in for the Google endpoints.
#[allow(dead_code)]
pub struct FakeGoogle {
    pub base_url: String,
    /// `METHOD path?query` of every request received, in order.
    pub requests: Arc<Mutex<Vec<String>>>,
}

#[allow(dead_code)]
impl FakeGoogle {
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

/// Serve `routes` on an ephemeral localhost port.
///
/// Paths follow `GoogleEndpoints::with_base`: `/token`,
/// `/oauth2/v1/tokeninfo`, `/accountmanagement/v1/...`,
/// `/businessinformation/v1/...`, `/v4/...`.
#[allow(dead_code)]
pub async fn spawn_fake_google(routes: Router) -> FakeGoogle {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let recorded = requests.clone();

    let app = routes.layer(axum::middleware::from_fn(
        move |req: Request, next: Next| {
            let recorded = recorded.clone();
            async move {
                let target = req
                    .uri()
                    .path_and_query()
                    .map(|pq| pq.as_str().to_string())
                    .unwrap_or_default();
                recorded
                    .lock()
                    .unwrap()
                    .push(format!("{} {}", req.method(), target));
                next.run(req).await
            }
        },
    ));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    FakeGoogle {
        base_url: format!("http://{addr}"),
        requests,
    }
}

/// Config pointing every Google endpoint at `base_url`.
#[allow(dead_code)]
pub fn config_for(base_url: &str) -> Config {
    Config {
        endpoints: GoogleEndpoints::with_base(base_url),
        ..Config::test_default()
    }
}

/// Create a test app from `config`.
#[allow(dead_code)]
pub fn create_test_app_with(config: Config) -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(config));
    (create_router(state.clone()), state)
}

/// Create a test app talking to `fake`.
#[allow(dead_code)]
pub fn create_test_app(fake: &FakeGoogle) -> Router {
    create_test_app_with(config_for(&fake.base_url)).0
}

/// Cookie header carrying a token that expires in an hour.
#[allow(dead_code)]
pub fn valid_token_cookie() -> String {
    let expiry = chrono::Utc::now().timestamp_millis() + 3_600_000;
    format!("google_access_token=ya29.test-access-token; google_token_expiry={expiry}")
}

/// Cookie header carrying a token that expired a minute ago.
#[allow(dead_code)]
pub fn expired_token_cookie() -> String {
    let expiry = chrono::Utc::now().timestamp_millis() - 60_000;
    format!("google_access_token=ya29.test-access-token; google_token_expiry={expiry}")
}

#[allow(dead_code)]
pub fn get_with_cookie(uri: &str, cookie: Option<&str>) -> axum::http::Request<Body> {
    let mut builder = axum::http::Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

#[allow(dead_code)]
pub async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[allow(dead_code)]
pub fn set_cookie_headers(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|value| value.to_str().unwrap().to_string())
        .collect()
}

#[allow(dead_code)]
pub fn location_header(response: &Response) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .expect("redirect should have a Location header")
        .to_str()
        .unwrap()
        .to_string()
}

/// JSON response with an explicit status, for fake handlers.
#[allow(dead_code)]
pub fn json_reply(status: StatusCode, body: Value) -> (StatusCode, axum::Json<Value>) {
    (status, axum::Json(body))
}

#[allow(dead_code)]
pub fn find_cookie(headers: &[String], name: &str) -> String {
    headers
        .iter()
        .find(|value| value.starts_with(&format!("{name}=")))
        .cloned()
        .unwrap_or_else(|| panic!("missing Set-Cookie header for {name}: {headers:?}"))
}
