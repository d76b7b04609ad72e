#![allow(dead_code)]

use phiscribe::config::{Config, SessionEntry};
use phiscribe::gateway::{hash_token, run_gateway_with_listener};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

pub const SESSION_TOKEN: &str = "test-session-token";
pub const USER_ID: &str = "dr-test";

/// Presidio stand-in: reports every occurrence of the given names as PERSON,
/// with character offsets like the real analyzer.
pub struct NameDetector {
    names: Vec<&'static str>,
}

impl Respond for NameDetector {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: Value = serde_json::from_slice(&request.body).unwrap_or(Value::Null);
        let text = body["text"].as_str().unwrap_or("");
        let mut results = Vec::new();
        for name in &self.names {
            let mut from = 0;
            while let Some(pos) = text[from..].find(name) {
                let byte_start = from + pos;
                let start = text[..byte_start].chars().count();
                results.push(json!({
                    "entity_type": "PERSON",
                    "start": start,
                    "end": start + name.chars().count(),
                    "score": 0.95,
                }));
                from = byte_start + name.len();
            }
        }
        ResponseTemplate::new(200).set_body_json(results)
    }
}

pub async fn mount_presidio(server: &MockServer, names: &[&'static str]) {
    Mock::given(method("POST"))
        .and(path("/analyze"))
        .respond_with(NameDetector {
            names: names.to_vec(),
        })
        .mount(server)
        .await;
}

pub async fn mount_presidio_down(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/analyze"))
        .respond_with(ResponseTemplate::new(503).set_body_string("analyzer overloaded"))
        .mount(server)
        .await;
}

pub fn anthropic_body(text: &str) -> Value {
    json!({
        "content": [{"type": "text", "text": text}],
        "usage": {"input_tokens": 120, "output_tokens": 40},
        "model": "claude-sonnet-4-6",
    })
}

/// Anthropic Messages API answering every call with `text`, expected `calls` times.
pub async fn mount_model_reply(server: &MockServer, text: &str, calls: u64) {
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(anthropic_body(text)))
        .expect(calls)
        .mount(server)
        .await;
}

/// Raw bodies of every request the model server received.
pub async fn model_payloads(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|r| String::from_utf8_lossy(&r.body).into_owned())
        .collect()
}

pub fn test_config(presidio_uri: &str, model_uri: &str) -> Config {
    let mut config = Config::default();
    config.llm.provider = "anthropic".into();
    config.llm.api_key = Some("sk-ant-test".into());
    config.llm.base_url = Some(model_uri.to_string());
    config.deid.analyzer_url = presidio_uri.to_string();
    config.audit.backend = "none".into();
    config.auth.sessions = vec![SessionEntry {
        user_id: USER_ID.into(),
        token_sha256: hash_token(SESSION_TOKEN),
    }];
    config
}

pub struct GatewayTestServer {
    pub base: String,
    handle: tokio::task::JoinHandle<anyhow::Result<()>>,
}

impl GatewayTestServer {
    pub async fn start(config: Config) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("ephemeral gateway listener should bind");
        let port = listener
            .local_addr()
            .expect("ephemeral gateway listener should expose local address")
            .port();
        let config = Arc::new(config);
        let handle = tokio::spawn(async move {
            run_gateway_with_listener("127.0.0.1", listener, config).await
        });
        let base = format!("http://127.0.0.1:{port}");
        wait_until_ready(&base).await;
        Self { base, handle }
    }

    pub fn url(&self, route: &str) -> String {
        format!("{}{route}", self.base)
    }

    /// POST JSON with the session cookie.
    pub async fn post(&self, route: &str, body: Value) -> reqwest::Response {
        reqwest::Client::new()
            .post(self.url(route))
            .header("cookie", format!("scribe_token={SESSION_TOKEN}"))
            .header("x-patient-id", "pt-1")
            .json(&body)
            .send()
            .await
            .expect("gateway request should complete")
    }
}

impl Drop for GatewayTestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn wait_until_ready(base: &str) {
    let client = reqwest::Client::new();
    for _ in 0..50 {
        if let Ok(resp) = client.get(format!("{base}/health")).send().await
            && resp.status().is_success()
        {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("gateway did not become ready");
}

/// Presidio, model server and gateway wired together.
pub struct Stack {
    pub presidio: MockServer,
    pub model: MockServer,
    pub gateway: GatewayTestServer,
}

impl Stack {
    /// Model mocks must be mounted before the first request; mount them on
    /// `stack.model` right after this returns.
    pub async fn start(names: &[&'static str]) -> Self {
        let presidio = MockServer::start().await;
        mount_presidio(&presidio, names).await;
        Self::with_presidio(presidio).await
    }

    pub async fn with_presidio(presidio: MockServer) -> Self {
        let model = MockServer::start().await;
        let gateway = GatewayTestServer::start(test_config(&presidio.uri(), &model.uri())).await;
        Self {
            presidio,
            model,
            gateway,
        }
    }
}
