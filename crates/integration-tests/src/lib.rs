//! Shared helpers for the integration test suites.
//!
//! The tests in `tests/` drive a running API server over HTTP. They require:
//! - A running `PostgreSQL` database with migrations applied
//!   (`cargo run -p rare-thread-cli -- migrate`)
//! - The API server running (`cargo run -p rare-thread-api`)
//!
//! All tests are `#[ignore]`d by default; run them with
//! `cargo test -p rare-thread-integration-tests -- --ignored`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use reqwest::Client;
use serde_json::{Value, json};
use uuid::Uuid;

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn api_base_url() -> String {
    std::env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:8000".to_owned())
}

/// Build an HTTP client for the tests.
///
/// # Panics
///
/// Panics if the client cannot be constructed.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .build()
        .expect("Failed to create HTTP client")
}

/// A short unique suffix for test entity ids and emails, so suites can be
/// re-run against the same database without colliding.
#[must_use]
pub fn unique_suffix() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Create a test user via the API and return its JSON representation.
///
/// # Panics
///
/// Panics if the request fails or returns a non-success status.
pub async fn create_test_user(client: &Client, cognito_user_id: Option<&str>) -> Value {
    let base_url = api_base_url();
    let email = format!("it-{}@example.com", unique_suffix());

    let mut body = json!({ "email": email, "name": "Integration Test" });
    if let Some(external) = cognito_user_id {
        body["cognito_user_id"] = json!(external);
    }

    let resp = client
        .post(format!("{base_url}/api/users"))
        .json(&body)
        .send()
        .await
        .expect("Failed to create test user");

    assert_eq!(resp.status(), reqwest::StatusCode::CREATED);
    resp.json().await.expect("Failed to parse user response")
}

/// Create a test product via the API and return its JSON representation.
///
/// # Panics
///
/// Panics if the request fails or returns a non-success status.
pub async fn create_test_product(client: &Client, body: &Value) -> Value {
    let base_url = api_base_url();

    let resp = client
        .post(format!("{base_url}/api/products"))
        .json(body)
        .send()
        .await
        .expect("Failed to create test product");

    assert_eq!(resp.status(), reqwest::StatusCode::CREATED);
    resp.json().await.expect("Failed to parse product response")
}
