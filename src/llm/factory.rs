use super::anthropic::AnthropicProvider;
use super::compatible::OpenAiCompatibleProvider;
use super::ollama::OllamaProvider;
use super::traits::Provider;
use crate::config::LlmConfig;
use crate::error::LlmError;
use std::sync::Arc;

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Resolve the API key for a provider.
///
/// Resolution order:
/// 1. The configured key (trimmed, ignored if empty)
/// 2. The provider's own environment variable (`ANTHROPIC_API_KEY`, `OPENAI_API_KEY`, `OPENROUTER_API_KEY`)
pub fn resolve_api_key(name: &str, explicit_api_key: Option<&str>) -> Option<String> {
    if let Some(key) = explicit_api_key.map(str::trim).filter(|k| !k.is_empty()) {
        return Some(key.to_string());
    }

    let env_var = match name {
        "anthropic" => "ANTHROPIC_API_KEY",
        "openai" => "OPENAI_API_KEY",
        "openrouter" => "OPENROUTER_API_KEY",
        _ => return None,
    };

    std::env::var(env_var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn is_known_provider(name: &str) -> bool {
    match name {
        "anthropic" | "openai" | "openrouter" | "ollama" => true,
        _ => name
            .strip_prefix("custom:")
            .is_some_and(|url| !url.trim().is_empty()),
    }
}

/// Hosted providers refuse unauthenticated calls; self-hosted ones may not need a key.
pub fn requires_api_key(name: &str) -> bool {
    matches!(name, "anthropic" | "openai" | "openrouter")
}

/// Create the configured [`Provider`].
///
/// Supported providers:
/// - `"anthropic"`: Anthropic Messages API
/// - `"openai"`, `"openrouter"`: OpenAI-compatible chat completions
/// - `"ollama"`: self-hosted Ollama
/// - `"custom:<base_url>"`: any OpenAI-compatible endpoint
pub fn create_provider(config: &LlmConfig) -> Result<Arc<dyn Provider>, LlmError> {
    let name = config.provider.trim();
    let api_key = resolve_api_key(name, config.api_key.as_deref());
    let key = api_key.as_deref();
    let base_url = config.base_url.as_deref().filter(|u| !u.trim().is_empty());
    let timeout = config.timeout_secs;

    let provider: Arc<dyn Provider> = match name {
        "anthropic" => Arc::new(AnthropicProvider::new(key, base_url, timeout)),
        "openai" => Arc::new(OpenAiCompatibleProvider::new(
            "openai",
            base_url.unwrap_or(OPENAI_BASE_URL),
            key,
            timeout,
        )),
        "openrouter" => Arc::new(OpenAiCompatibleProvider::new(
            "openrouter",
            base_url.unwrap_or(OPENROUTER_BASE_URL),
            key,
            timeout,
        )),
        "ollama" => Arc::new(OllamaProvider::new(base_url, timeout)),
        other => match other.strip_prefix("custom:") {
            Some(url) if !url.trim().is_empty() => Arc::new(OpenAiCompatibleProvider::new(
                "custom", url, key, timeout,
            )),
            Some(_) => {
                return Err(LlmError::NotConfigured {
                    provider: "custom".into(),
                    message: "custom provider requires a URL. Format: custom:https://your-api.com"
                        .into(),
                });
            }
            None => {
                return Err(LlmError::NotConfigured {
                    provider: other.to_string(),
                    message: "unknown provider".into(),
                });
            }
        },
    };

    tracing::info!(provider = provider.name(), model = %config.model, "llm.provider_ready");
    Ok(provider)
}
