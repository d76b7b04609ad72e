use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One role-tagged message sent to a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Per-call sampling settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatOptions {
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

/// Raw provider output plus accounting for audit metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelReply {
    pub content: String,
    pub usage: Option<TokenUsage>,
    /// Model id as reported by the provider, which may differ from the requested alias.
    pub model: Option<String>,
}

impl ModelReply {
    pub fn text_only(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            usage: None,
            model: None,
        }
    }

    pub fn with_usage(content: impl Into<String>, input_tokens: u64, output_tokens: u64) -> Self {
        Self {
            content: content.into(),
            usage: Some(TokenUsage {
                input_tokens,
                output_tokens,
            }),
            model: None,
        }
    }

    #[must_use]
    pub fn with_model(mut self, model: Option<String>) -> Self {
        self.model = model;
        self
    }
}

/// Split system messages (joined with blank lines) from the conversation turns.
///
/// Providers with a dedicated system field need this shape.
pub fn split_system(messages: &[ChatMessage]) -> (Option<String>, Vec<&ChatMessage>) {
    let system_parts: Vec<&str> = messages
        .iter()
        .filter(|m| m.role == MessageRole::System)
        .map(|m| m.content.as_str())
        .collect();
    let system = (!system_parts.is_empty()).then(|| system_parts.join("\n\n"));
    let turns = messages
        .iter()
        .filter(|m| m.role != MessageRole::System)
        .collect();
    (system, turns)
}
