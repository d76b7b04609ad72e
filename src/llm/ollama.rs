use super::http_client::build_provider_client_with_timeout;
use super::scrub::{api_error, transport_error};
use super::traits::Provider;
use super::types::{ChatMessage, ChatOptions, ModelReply};
use crate::error::LlmError;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;

const PROVIDER: &str = "ollama";

/// Self-hosted Ollama (`/api/chat`, non-streaming).
pub struct OllamaProvider {
    chat_url: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    stream: bool,
    options: Options,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct Options {
    temperature: f64,
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ResponseMessage,
    prompt_eval_count: Option<u64>,
    eval_count: Option<u64>,
    model: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

impl OllamaProvider {
    pub fn new(base_url: Option<&str>, timeout_secs: u64) -> Self {
        let base = base_url
            .unwrap_or("http://localhost:11434")
            .trim_end_matches('/');
        Self {
            chat_url: format!("{base}/api/chat"),
            client: build_provider_client_with_timeout(timeout_secs),
        }
    }

    fn build_request<'a>(messages: &'a [ChatMessage], options: &'a ChatOptions) -> ChatRequest<'a> {
        ChatRequest {
            model: &options.model,
            messages: messages
                .iter()
                .map(|m| Message {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
            stream: false,
            options: Options {
                temperature: options.temperature,
                num_predict: options.max_tokens,
            },
        }
    }

    async fn call_api(
        &self,
        messages: &[ChatMessage],
        options: &ChatOptions,
    ) -> Result<ModelReply, LlmError> {
        let request = Self::build_request(messages, options);
        let response = self
            .client
            .post(&self.chat_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER, &e))?;

        if !response.status().is_success() {
            return Err(api_error(PROVIDER, response).await);
        }

        let chat_response: ChatResponse =
            response
                .json()
                .await
                .map_err(|e| LlmError::InvalidResponse {
                    provider: PROVIDER.into(),
                    message: e.to_string(),
                })?;

        let text = chat_response.message.content;
        let reply = match (chat_response.prompt_eval_count, chat_response.eval_count) {
            (Some(input_tokens), Some(output_tokens)) => {
                ModelReply::with_usage(text, input_tokens, output_tokens)
            }
            _ => ModelReply::text_only(text),
        };
        Ok(reply.with_model(chat_response.model))
    }
}

impl Provider for OllamaProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    fn invoke<'a>(
        &'a self,
        messages: &'a [ChatMessage],
        options: &'a ChatOptions,
    ) -> Pin<Box<dyn Future<Output = Result<ModelReply, LlmError>> + Send + 'a>> {
        Box::pin(self.call_api(messages, options))
    }
}
