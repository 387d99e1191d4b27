use httpmock::prelude::*;
use std::time::Duration;

use reactant_core::{Llm, LlmRequest, ReactantError, Retrying};
use reactant_llm::{truncate_at_stop, OpenAiClient, OpenAiConfig};
use serde_json::json;

fn client_for(server: &MockServer) -> OpenAiClient {
    let config = OpenAiConfig::builder()
        .api_key("sk-test")
        .base_url(server.base_url())
        .model("gpt-4o-mini")
        .build()
        .expect("config");
    OpenAiClient::new(config).expect("client")
}

fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "created": 1,
        "model": "gpt-4o-mini",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 12, "completion_tokens": 5, "total_tokens": 17}
    })
}

#[tokio::test]
async fn invoke_sends_prompt_and_stop_sequences() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/chat/completions")
            .header("authorization", "Bearer sk-test")
            .json_body(json!({
                "model": "gpt-4o-mini",
                "messages": [{"role": "user", "content": "Question: Fish?"}],
                "stop": ["\nObservation"],
                "temperature": 0.0,
                "stream": false
            }));
        then.status(200)
            .json_body(completion("Action: get_text_length\nAction Input: Fish"));
    });

    let request = LlmRequest::new("", "Question: Fish?")
        .with_stop(vec!["\nObservation".to_string()])
        .with_temperature(0.0);
    let response = client_for(&server).invoke(request).await.expect("invoke");

    assert_eq!(response.text, "Action: get_text_length\nAction Input: Fish");
    assert_eq!(response.finish_reason.as_deref(), Some("stop"));
    assert_eq!(response.usage.map(|u| u.total_tokens), Some(17));
    mock.assert();
}

#[tokio::test]
async fn invoke_truncates_at_stop_marker_when_provider_ignores_it() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(200).json_body(completion(
            "Action: get_text_length\nAction Input: Fish\nObservation: 4",
        ));
    });

    let request = LlmRequest::new("gpt-4o-mini", "Question: Fish?")
        .with_stop(vec!["\nObservation".to_string()]);
    let response = client_for(&server).invoke(request).await.expect("invoke");

    assert_eq!(response.text, "Action: get_text_length\nAction Input: Fish");
}

#[tokio::test]
async fn unauthorized_maps_to_authentication_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(401).json_body(json!({
            "error": {"message": "Incorrect API key provided", "type": "invalid_request_error", "code": "invalid_api_key"}
        }));
    });

    let err = client_for(&server)
        .invoke(LlmRequest::new("gpt-4o-mini", "hi"))
        .await
        .unwrap_err();
    assert!(matches!(err, ReactantError::Authentication(ref m) if m == "Incorrect API key provided"));
}

#[tokio::test]
async fn too_many_requests_maps_to_rate_limited() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(429).body("slow down");
    });

    let err = client_for(&server)
        .invoke(LlmRequest::new("gpt-4o-mini", "hi"))
        .await
        .unwrap_err();
    assert!(matches!(err, ReactantError::RateLimited(ref m) if m.contains("slow down")));
}

#[tokio::test]
async fn server_error_maps_to_provider_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(500).json_body(json!({"error": {"message": "overloaded"}}));
    });

    let err = client_for(&server)
        .invoke(LlmRequest::new("gpt-4o-mini", "hi"))
        .await
        .unwrap_err();
    assert!(matches!(err, ReactantError::LlmProvider(ref m) if m == "overloaded"));
}

#[tokio::test]
async fn bad_request_fails_fast_behind_retrying() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(400)
            .json_body(json!({"error": {"message": "model does not exist"}}));
    });

    let err = Retrying::new(client_for(&server), 3)
        .with_backoff(Duration::from_millis(1), Duration::from_millis(1))
        .invoke(LlmRequest::new("no-such-model", "hi"))
        .await
        .unwrap_err();

    assert!(matches!(err, ReactantError::InvalidRequest(ref m) if m == "model does not exist"));
    assert_eq!(mock.hits(), 1);
}

#[tokio::test]
async fn not_found_and_unprocessable_are_invalid_requests() {
    for status in [404, 422] {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(status).body("nope");
        });

        let err = client_for(&server)
            .invoke(LlmRequest::new("gpt-4o-mini", "hi"))
            .await
            .unwrap_err();
        assert!(
            matches!(err, ReactantError::InvalidRequest(ref m) if m.contains("nope")),
            "status {status}: {err:?}"
        );
    }
}

#[tokio::test]
async fn server_error_is_retried_behind_retrying() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(503).json_body(json!({"error": {"message": "overloaded"}}));
    });

    let err = Retrying::new(client_for(&server), 2)
        .with_backoff(Duration::from_millis(1), Duration::from_millis(1))
        .invoke(LlmRequest::new("gpt-4o-mini", "hi"))
        .await
        .unwrap_err();

    assert!(matches!(err, ReactantError::MaxRetriesExceeded { max: 2, .. }));
    assert_eq!(mock.hits(), 2);
}

#[tokio::test]
async fn empty_choices_is_a_provider_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(200).json_body(json!({"choices": []}));
    });

    let err = client_for(&server)
        .invoke(LlmRequest::new("gpt-4o-mini", "hi"))
        .await
        .unwrap_err();
    assert!(matches!(err, ReactantError::LlmProvider(ref m) if m == "no choices returned"));
}

#[test]
fn truncate_picks_earliest_marker() {
    let stop = vec!["\nObservation".to_string(), "\nQuestion".to_string()];
    assert_eq!(truncate_at_stop("a\nQuestion b\nObservation c", &stop), "a");
    assert_eq!(truncate_at_stop("no markers", &stop), "no markers");
    assert_eq!(truncate_at_stop("kept", &[String::new()]), "kept");
}
