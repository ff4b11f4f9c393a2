//! Wiremock-backed tests for the OpenAI-compatible backend.

use omnimind_core::{Error, GenerationBackend, InferenceBackend};
use omnimind_inference::{OpenAiBackend, OpenAiConfig};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn backend_for(server: &MockServer) -> OpenAiBackend {
    OpenAiBackend::new(OpenAiConfig {
        base_url: server.uri(),
        api_key: Some("test-key".to_string()),
        model: "gpt-4".to_string(),
        timeout_seconds: 5,
    })
    .unwrap()
}

fn completion_body(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-test",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
    })
}

#[tokio::test]
async fn test_generate_json_parses_model_output() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "model": "gpt-4",
            "response_format": {"type": "json_object"}
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion_body(r#"{"tasks":[{"title":"Buy milk"}]}"#)),
        )
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let value = backend
        .generate_json("You extract tasks.", "Buy milk tomorrow", 0.1)
        .await
        .unwrap();

    assert_eq!(value["tasks"][0]["title"], "Buy milk");
}

#[tokio::test]
async fn test_generate_json_rejects_non_json_output() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(completion_body("Sure! Here are the tasks:")),
        )
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let err = backend
        .generate_json("sys", "prompt", 0.1)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Inference(_)));
}

#[tokio::test]
async fn test_upstream_error_surfaces_as_inference_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": {
                "message": "Rate limit reached",
                "type": "rate_limit_error",
                "code": "rate_limited"
            }
        })))
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let err = backend
        .generate_json("sys", "prompt", 0.1)
        .await
        .unwrap_err();

    match err {
        Error::Inference(msg) => {
            assert!(msg.contains("429"));
            assert!(msg.contains("Rate limit reached"));
        }
        other => panic!("Expected Inference error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_generate_with_system_returns_plain_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("plain text")))
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let text = backend
        .generate_with_system("sys", "prompt")
        .await
        .unwrap();
    assert_eq!(text, "plain text");
}

#[tokio::test]
async fn test_health_check() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    assert!(backend.health_check().await.unwrap());
}
