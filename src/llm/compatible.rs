//! OpenAI-compatible chat completions (`openai`, `openrouter`, `custom:<url>`).

use super::http_client::build_provider_client_with_timeout;
use super::scrub::{api_error, transport_error};
use super::traits::Provider;
use super::types::{ChatMessage, ChatOptions, ModelReply};
use crate::error::LlmError;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;

pub struct OpenAiCompatibleProvider {
    pub(crate) name: String,
    api_key: Option<String>,
    chat_url: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    usage: Option<Usage>,
    model: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u64,
    completion_tokens: u64,
}

impl OpenAiCompatibleProvider {
    pub fn new(name: &str, base_url: &str, api_key: Option<&str>, timeout_secs: u64) -> Self {
        let base_url = base_url.trim_end_matches('/');
        let chat_url = if base_url.ends_with("chat/completions") {
            base_url.to_string()
        } else {
            format!("{base_url}/chat/completions")
        };
        Self {
            name: name.to_string(),
            api_key: api_key
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(ToString::to_string),
            chat_url,
            client: build_provider_client_with_timeout(timeout_secs),
        }
    }

    pub fn chat_url(&self) -> &str {
        &self.chat_url
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
            temperature: options.temperature,
            max_tokens: options.max_tokens,
        }
    }

    async fn call_api(
        &self,
        messages: &[ChatMessage],
        options: &ChatOptions,
    ) -> Result<ModelReply, LlmError> {
        let request = Self::build_request(messages, options);
        let mut builder = self.client.post(&self.chat_url).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| transport_error(&self.name, &e))?;

        if !response.status().is_success() {
            return Err(api_error(&self.name, response).await);
        }

        let chat_response: ChatResponse =
            response
                .json()
                .await
                .map_err(|e| LlmError::InvalidResponse {
                    provider: self.name.clone(),
                    message: e.to_string(),
                })?;

        let text = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| LlmError::InvalidResponse {
                provider: self.name.clone(),
                message: "response contained no choices".into(),
            })?;

        let reply = match chat_response.usage {
            Some(usage) => {
                ModelReply::with_usage(text, usage.prompt_tokens, usage.completion_tokens)
            }
            None => ModelReply::text_only(text),
        };
        Ok(reply.with_model(chat_response.model))
    }
}

impl Provider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn invoke<'a>(
        &'a self,
        messages: &'a [ChatMessage],
        options: &'a ChatOptions,
    ) -> Pin<Box<dyn Future<Output = Result<ModelReply, LlmError>> + Send + 'a>> {
        Box::pin(self.call_api(messages, options))
    }
}
