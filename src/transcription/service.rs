use super::traits::Transcriber;
use super::upload::AudioUpload;
use crate::audit::{AuditEvent, AuditSink, RequestContext};
use crate::error::TranscriptionError;
use std::sync::Arc;
use std::time::Instant;

const FEATURE: &str = "whisper";
const ENDPOINT: &str = "/ai/transcribe";

/// Audio → transcript, audited like the scribe operations.
///
/// The transcript itself is returned to the caller only; it never reaches logs.
pub struct TranscriptionService {
    transcriber: Option<Arc<dyn Transcriber>>,
    audit: Arc<dyn AuditSink>,
}

impl TranscriptionService {
    pub fn new(transcriber: Option<Arc<dyn Transcriber>>, audit: Arc<dyn AuditSink>) -> Self {
        Self { transcriber, audit }
    }

    pub fn is_configured(&self) -> bool {
        self.transcriber.is_some()
    }

    pub async fn transcribe(
        &self,
        ctx: &RequestContext,
        upload: AudioUpload,
    ) -> Result<String, TranscriptionError> {
        let started = Instant::now();
        let metadata = serde_json::json!({
            "mimeType": upload.mime_type(),
            "sizeBytes": upload.len(),
        });

        let result = match &self.transcriber {
            Some(transcriber) => transcriber.transcribe(upload).await,
            None => Err(TranscriptionError::NotConfigured),
        };

        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        let event = AuditEvent::new(ctx, FEATURE, ENDPOINT).with_metadata(metadata);
        match &result {
            Ok(_) => {
                tracing::info!(endpoint = ENDPOINT, duration_ms, "transcribe.ok");
                self.audit.record(&event);
            }
            Err(err) => {
                tracing::warn!(endpoint = ENDPOINT, duration_ms, error = %err, "transcribe.failed");
                self.audit.record(&event.failed(err.to_string()));
            }
        }
        result
    }
}
