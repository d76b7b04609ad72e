use phiscribe::LlmError;
use phiscribe::llm::anthropic::AnthropicProvider;
use phiscribe::llm::compatible::OpenAiCompatibleProvider;
use phiscribe::llm::ollama::OllamaProvider;
use phiscribe::llm::{ChatMessage, ChatOptions, Provider, TokenUsage};
use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn options() -> ChatOptions {
    ChatOptions {
        model: "test-model".into(),
        temperature: 0.3,
        max_tokens: 1024,
    }
}

fn messages() -> Vec<ChatMessage> {
    vec![
        ChatMessage::system("Return JSON only."),
        ChatMessage::user("Transcript: [PERSON_0] has chest pain."),
    ]
}

#[tokio::test]
async fn anthropic_sends_headers_and_lifts_system_prompt() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "sk-ant-test"))
        .and(header("anthropic-version", "2023-06-01"))
        .and(body_partial_json(json!({
            "model": "test-model",
            "system": "Return JSON only.",
            "max_tokens": 1024,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [{"type": "text", "text": "{\"ok\":true}"}],
            "usage": {"input_tokens": 30, "output_tokens": 5},
            "model": "claude-sonnet-4-6-20260101",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = AnthropicProvider::new(Some("sk-ant-test"), Some(&server.uri()), 10);
    let reply = provider.invoke(&messages(), &options()).await.unwrap();

    assert_eq!(reply.content, "{\"ok\":true}");
    assert_eq!(
        reply.usage,
        Some(TokenUsage {
            input_tokens: 30,
            output_tokens: 5
        })
    );
    assert_eq!(reply.model.as_deref(), Some("claude-sonnet-4-6-20260101"));

    let received = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&received[0].body).unwrap();
    assert_eq!(body["messages"].as_array().unwrap().len(), 1);
    assert_eq!(body["messages"][0]["role"], "user");
}

#[tokio::test]
async fn anthropic_auth_failure_maps_to_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid x-api-key"))
        .mount(&server)
        .await;

    let provider = AnthropicProvider::new(Some("sk-ant-bad"), Some(&server.uri()), 10);
    let err = provider.invoke(&messages(), &options()).await.unwrap_err();
    assert!(matches!(err, LlmError::Auth { ref provider } if provider == "anthropic"));
}

#[tokio::test]
async fn rate_limit_maps_to_rate_limited() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .mount(&server)
        .await;

    let provider = OpenAiCompatibleProvider::new("openai", &server.uri(), Some("sk-test"), 10);
    let err = provider.invoke(&messages(), &options()).await.unwrap_err();
    assert!(matches!(err, LlmError::RateLimited { .. }));
}

#[tokio::test]
async fn server_error_body_is_redacted_and_truncated() {
    let server = MockServer::start().await;
    let noisy = format!("upstream failed for key sk-live-abcdef123456 {}", "x".repeat(400));
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string(noisy))
        .mount(&server)
        .await;

    let provider = OpenAiCompatibleProvider::new("openrouter", &server.uri(), Some("sk-or-test"), 10);
    let err = provider.invoke(&messages(), &options()).await.unwrap_err();
    let text = err.to_string();
    assert!(!text.contains("abcdef123456"));
    assert!(text.len() < 400);
}

#[tokio::test]
async fn openai_compatible_uses_bearer_and_reads_first_choice() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({"model": "test-model", "temperature": 0.3})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "hello"}}],
            "usage": {"prompt_tokens": 11, "completion_tokens": 2},
            "model": "gpt-test",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = OpenAiCompatibleProvider::new("openai", &server.uri(), Some("sk-test"), 10);
    let reply = provider.invoke(&messages(), &options()).await.unwrap();
    assert_eq!(reply.content, "hello");
    assert_eq!(reply.usage.map(|u| u.input_tokens), Some(11));

    let received = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&received[0].body).unwrap();
    assert_eq!(body["messages"][0]["role"], "system");
}

#[tokio::test]
async fn empty_choices_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let provider = OpenAiCompatibleProvider::new("custom", &server.uri(), None, 10);
    let err = provider.invoke(&messages(), &options()).await.unwrap_err();
    assert!(matches!(err, LlmError::InvalidResponse { .. }));
}

#[tokio::test]
async fn ollama_posts_non_streaming_chat() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(json!({"stream": false, "options": {"num_predict": 1024}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": {"role": "assistant", "content": "local reply"},
            "prompt_eval_count": 40,
            "eval_count": 8,
            "model": "llama3",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = OllamaProvider::new(Some(&server.uri()), 10);
    let reply = provider.invoke(&messages(), &options()).await.unwrap();
    assert_eq!(reply.content, "local reply");
    assert_eq!(reply.usage.map(|u| u.output_tokens), Some(8));
}
