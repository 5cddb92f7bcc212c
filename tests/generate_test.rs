//! Integration tests for the prompt relay endpoint.

mod common;

use common::TestApp;
use relay_service::services::providers::{MockLookupProvider, MockTextProvider};
use serde_json::{json, Value};
use std::sync::Arc;

async fn spawn_with(provider: MockTextProvider) -> TestApp {
    TestApp::spawn(Arc::new(provider), Arc::new(MockLookupProvider::not_found())).await
}

#[tokio::test]
async fn missing_prompt_returns_400() {
    let app = spawn_with(MockTextProvider::replying("unused")).await;

    let response = app.post_json("/api/gemini", json!({})).await;

    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["error"], "No prompt provided");
}

#[tokio::test]
async fn blank_prompt_returns_400() {
    let app = spawn_with(MockTextProvider::replying("unused")).await;

    let response = app.post_json("/api/gemini", json!({ "prompt": "   " })).await;

    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["error"], "No prompt provided");
}

#[tokio::test]
async fn prompt_relays_generated_text() {
    let app = spawn_with(MockTextProvider::replying("X")).await;

    let response = app
        .post_json("/api/gemini", json!({ "prompt": "say X" }))
        .await;

    assert_eq!(response.status().as_u16(), 200);
    let body = response.text().await.expect("Failed to read body");
    assert_eq!(body, r#"{"response":"X"}"#);
}

#[tokio::test]
async fn empty_candidates_return_500() {
    let app = spawn_with(MockTextProvider::empty()).await;

    let response = app
        .post_json("/api/gemini", json!({ "prompt": "hello" }))
        .await;

    assert_eq!(response.status().as_u16(), 500);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(
        body["error"],
        "I'm sorry, Gemini didn't provide a clear response for that."
    );
}

#[tokio::test]
async fn safety_block_reports_the_reason() {
    let app = spawn_with(MockTextProvider::blocked(Some("SAFETY"))).await;

    let response = app
        .post_json("/api/gemini", json!({ "prompt": "hello" }))
        .await;

    assert_eq!(response.status().as_u16(), 500);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(
        body["error"],
        "My response was blocked due to: SAFETY. Please try rephrasing."
    );
}

#[tokio::test]
async fn unconfigured_provider_returns_500() {
    let app = spawn_with(MockTextProvider::unconfigured()).await;

    let response = app
        .post_json("/api/gemini", json!({ "prompt": "hello" }))
        .await;

    assert_eq!(response.status().as_u16(), 500);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["error"], "Gemini API not configured.");
}

#[tokio::test]
async fn provider_fault_returns_apology() {
    let app = spawn_with(MockTextProvider::failing("upstream exploded")).await;

    let response = app
        .post_json("/api/gemini", json!({ "prompt": "hello" }))
        .await;

    assert_eq!(response.status().as_u16(), 500);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(
        body["error"],
        "I'm sorry, I couldn't get a response from Gemini at this moment due to an error."
    );
}

#[tokio::test]
async fn identical_requests_get_identical_responses() {
    let app = spawn_with(MockTextProvider::replying("deterministic")).await;

    let first = app
        .post_json("/api/gemini", json!({ "prompt": "repeat me" }))
        .await;
    let first_status = first.status();
    let first_body = first.text().await.expect("Failed to read body");

    let second = app
        .post_json("/api/gemini", json!({ "prompt": "repeat me" }))
        .await;
    let second_status = second.status();
    let second_body = second.text().await.expect("Failed to read body");

    assert_eq!(first_status, second_status);
    assert_eq!(first_body, second_body);
}
