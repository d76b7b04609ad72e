//! Audio upload validation and the self-hosted Whisper ASR client.

pub mod service;
pub mod traits;
pub mod upload;
pub mod whisper;

pub use service::TranscriptionService;
pub use traits::Transcriber;
pub use upload::{ALLOWED_MIME_TYPES, AudioUpload, MAX_AUDIO_BYTES};
pub use whisper::WhisperTranscriber;

use crate::config::TranscriptionConfig;
use std::sync::Arc;

/// Factory: the configured transcriber, or `None` when transcription is disabled.
pub fn create_transcriber(config: &TranscriptionConfig) -> Option<Arc<dyn Transcriber>> {
    WhisperTranscriber::from_config(config).map(|t| Arc::new(t) as Arc<dyn Transcriber>)
}
