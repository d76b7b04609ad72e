use super::http_client::build_provider_client_with_timeout;
use super::scrub::{api_error, transport_error};
use super::traits::Provider;
use super::types::{ChatMessage, ChatOptions, MessageRole, ModelReply, split_system};
use crate::error::LlmError;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;

const PROVIDER: &str = "anthropic";
const API_VERSION: &str = "2023-06-01";

/// Anthropic Messages API.
pub struct AnthropicProvider {
    api_key: Option<String>,
    messages_url: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<Message<'a>>,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    content: Vec<ResponseContentBlock>,
    usage: Option<Usage>,
    model: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    input_tokens: u64,
    output_tokens: u64,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ResponseContentBlock {
    Text {
        text: String,
    },
    #[serde(other)]
    Unsupported,
}

impl AnthropicProvider {
    pub fn new(api_key: Option<&str>, base_url: Option<&str>, timeout_secs: u64) -> Self {
        let base = base_url
            .map_or("https://api.anthropic.com", |u| u.trim_end_matches('/'))
            .to_string();
        Self {
            api_key: api_key
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(ToString::to_string),
            messages_url: format!("{base}/v1/messages"),
            client: build_provider_client_with_timeout(timeout_secs),
        }
    }

    fn build_request<'a>(messages: &'a [ChatMessage], options: &'a ChatOptions) -> ChatRequest<'a> {
        let (system, turns) = split_system(messages);
        ChatRequest {
            model: &options.model,
            max_tokens: options.max_tokens,
            system,
            messages: turns
                .into_iter()
                .map(|m| Message {
                    role: match m.role {
                        MessageRole::Assistant => "assistant",
                        MessageRole::User | MessageRole::System => "user",
                    },
                    content: &m.content,
                })
                .collect(),
            temperature: options.temperature,
        }
    }

    async fn call_api(
        &self,
        messages: &[ChatMessage],
        options: &ChatOptions,
    ) -> Result<ModelReply, LlmError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| LlmError::NotConfigured {
            provider: PROVIDER.into(),
            message: "set ANTHROPIC_API_KEY or llm.api_key".into(),
        })?;

        let request = Self::build_request(messages, options);
        let response = self
            .client
            .post(&self.messages_url)
            .header("x-api-key", api_key)
            .header("anthropic-version", API_VERSION)
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

        let text: String = chat_response
            .content
            .into_iter()
            .filter_map(|block| match block {
                ResponseContentBlock::Text { text } => Some(text),
                ResponseContentBlock::Unsupported => None,
            })
            .collect::<Vec<_>>()
            .join("");

        let reply = match chat_response.usage {
            Some(usage) => ModelReply::with_usage(text, usage.input_tokens, usage.output_tokens),
            None => ModelReply::text_only(text),
        };
        Ok(reply.with_model(chat_response.model))
    }
}

impl Provider for AnthropicProvider {
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
