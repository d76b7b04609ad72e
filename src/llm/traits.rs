use super::types::{ChatMessage, ChatOptions, ModelReply};
use crate::error::LlmError;
use std::future::Future;
use std::pin::Pin;

/// Model Invocation Client: one request, one reply, no retries.
///
/// Implementations carry no knowledge of PHI. Anything they receive has
/// already been de-identified by the caller.
pub trait Provider: Send + Sync {
    /// Provider identifier (e.g. "anthropic", "ollama").
    fn name(&self) -> &str;

    fn invoke<'a>(
        &'a self,
        messages: &'a [ChatMessage],
        options: &'a ChatOptions,
    ) -> Pin<Box<dyn Future<Output = Result<ModelReply, LlmError>> + Send + 'a>>;
}
