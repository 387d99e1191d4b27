use reactant_llm::openai_compatible::*;

#[test]
fn chat_completion_request_serialization() {
    let request = ChatCompletionRequest {
        model: "gpt-4o-mini".to_string(),
        messages: vec![ChatMessage::user("hi")],
        stop: vec![],
        temperature: Some(0.5),
        max_tokens: Some(100),
        stream: false,
    };

    let json = serde_json::to_string(&request).unwrap();
    assert!(json.contains("\"model\":\"gpt-4o-mini\""));
    assert!(json.contains("\"role\":\"user\""));
    assert!(json.contains("\"temperature\":0.5"));
    assert!(json.contains("\"max_tokens\":100"));
    assert!(json.contains("\"stream\":false"));
    assert!(!json.contains("\"stop\""));
}

#[test]
fn chat_completion_response_deserialization() {
    let json = r#"{
        "id": "chat-123",
        "object": "chat.completion",
        "created": 1234567890,
        "model": "gpt-4o-mini",
        "choices": [{
            "index": 0,
            "message": {
                "role": "assistant",
                "content": "Final Answer: 4"
            },
            "finish_reason": "stop"
        }],
        "usage": {
            "prompt_tokens": 10,
            "completion_tokens": 5,
            "total_tokens": 15
        }
    }"#;

    let response: ChatCompletionResponse = serde_json::from_str(json).unwrap();
    assert_eq!(response.id, "chat-123");
    assert_eq!(response.choices.len(), 1);
    assert_eq!(
        response.choices[0].message.content.as_deref(),
        Some("Final Answer: 4")
    );
    assert_eq!(response.usage.unwrap().total_tokens, 15);
}

#[test]
fn error_response_deserialization() {
    let json = r#"{
        "error": {
            "message": "Invalid API key",
            "type": "authentication_error",
            "code": "invalid_api_key"
        }
    }"#;

    let error: OpenAiError = serde_json::from_str(json).unwrap();
    assert_eq!(error.error.message, "Invalid API key");
    assert_eq!(error.error.error_type.as_deref(), Some("authentication_error"));
    assert_eq!(error.error.code.as_deref(), Some("invalid_api_key"));
}
