//! HTTP-level tests for the Gemini client against a mock server

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use venueflow_gemini::{GeminiClient, GeminiError, GenerateContentRequest, GenerationConfig};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> GeminiClient {
    GeminiClient::new("test-key".to_string())
        .with_base_url(server.uri())
        .with_model("test-model")
}

#[tokio::test]
async fn generate_content_posts_prompt_and_reads_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/test-model:generateContent"))
        .and(query_param("key", "test-key"))
        .and(body_json(serde_json::json!({
            "contents": [{ "parts": [{ "text": "Say hi" }] }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [{ "content": { "role": "model", "parts": [{ "text": "Hi!" }] } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = client(&server)
        .generate_content(GenerateContentRequest::from_prompt("Say hi"))
        .await
        .unwrap();

    assert_eq!(response.text().unwrap(), "Hi!");
}

#[tokio::test]
async fn structured_request_carries_generation_config() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/test-model:generateContent"))
        .and(body_json(serde_json::json!({
            "contents": [{ "parts": [{ "text": "Pick a venue" }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": { "type": "OBJECT" }
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": "{\"venueId\":\"bus\"}" }] } }]
        })))
        .mount(&server)
        .await;

    let request = GenerateContentRequest::from_prompt("Pick a venue")
        .with_generation_config(GenerationConfig::json(serde_json::json!({ "type": "OBJECT" })));
    let response = client(&server).generate_content(request).await.unwrap();

    assert_eq!(response.text().unwrap(), "{\"venueId\":\"bus\"}");
}

#[tokio::test]
async fn error_statuses_map_to_typed_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = client(&server);

    let first = client
        .generate_content(GenerateContentRequest::from_prompt("x"))
        .await;
    assert!(matches!(first, Err(GeminiError::RateLimited)));

    let second = client
        .generate_content(GenerateContentRequest::from_prompt("x"))
        .await;
    match second {
        Err(GeminiError::ApiError { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "boom");
        },
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_server_is_a_request_failure() {
    let client = GeminiClient::new("k".to_string()).with_base_url("http://127.0.0.1:1");

    let result = client
        .generate_content(GenerateContentRequest::from_prompt("x"))
        .await;

    assert!(matches!(result, Err(GeminiError::RequestFailed(_))));
}
