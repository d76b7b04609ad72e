use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionConfig {
    /// Self-hosted Whisper ASR base URL. Unset disables `/ai/transcribe`.
    #[serde(default)]
    pub whisper_url: Option<String>,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    120_000
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            whisper_url: None,
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl TranscriptionConfig {
    pub fn is_configured(&self) -> bool {
        self.whisper_url
            .as_deref()
            .is_some_and(|url| !url.trim().is_empty())
    }
}
