// ── Infrastructure ───────────────────────────────────────────────────────────
pub mod http_client;
pub mod scrub;
pub mod traits;
pub mod types;

pub mod factory;

// ── Provider implementations ────────────────────────────────────────────────
pub mod anthropic;
pub mod compatible;
pub mod ollama;

pub use factory::{create_provider, resolve_api_key};
pub use scrub::{api_error, sanitize_api_error, scrub_secret_patterns};
pub use traits::Provider;
pub use types::{ChatMessage, ChatOptions, MessageRole, ModelReply, TokenUsage};
