use super::traits::Transcriber;
use super::upload::AudioUpload;
use crate::config::TranscriptionConfig;
use crate::error::TranscriptionError;
use crate::llm::sanitize_api_error;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// Self-hosted Whisper ASR webservice (`POST /asr`).
pub struct WhisperTranscriber {
    asr_url: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct AsrResponse {
    text: String,
}

impl WhisperTranscriber {
    /// `None` when no Whisper URL is configured.
    pub fn from_config(config: &TranscriptionConfig) -> Option<Self> {
        let base = config
            .whisper_url
            .as_deref()
            .map(|u| u.trim().trim_end_matches('/'))
            .filter(|u| !u.is_empty())?;
        Some(Self {
            asr_url: format!("{base}/asr?task=transcribe&language=en&output=json"),
            client: Client::builder()
                .timeout(Duration::from_millis(config.timeout_ms))
                .connect_timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_else(|_| Client::new()),
        })
    }

    pub fn asr_url(&self) -> &str {
        &self.asr_url
    }

    async fn call_api(&self, upload: AudioUpload) -> Result<String, TranscriptionError> {
        let file_name = format!("recording.{}", upload.extension());
        let mime_type = upload.mime_type().to_string();
        let part = Part::bytes(upload.into_bytes())
            .file_name(file_name)
            .mime_str(&mime_type)
            .map_err(|e| TranscriptionError::Upstream(format!("invalid audio part: {e}")))?;
        let form = Form::new().part("audio_file", part);

        let response = self
            .client
            .post(&self.asr_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                TranscriptionError::Upstream(if e.is_timeout() {
                    "Whisper ASR timed out".into()
                } else {
                    "Whisper ASR unreachable".into()
                })
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranscriptionError::Upstream(format!(
                "Whisper ASR returned {}: {}",
                status.as_u16(),
                sanitize_api_error(&body)
            )));
        }

        let parsed: AsrResponse = response
            .json()
            .await
            .map_err(|e| TranscriptionError::Upstream(format!("unreadable ASR response: {e}")))?;
        Ok(parsed.text.trim().to_string())
    }
}

impl Transcriber for WhisperTranscriber {
    fn name(&self) -> &str {
        "whisper"
    }

    fn transcribe(
        &self,
        upload: AudioUpload,
    ) -> Pin<Box<dyn Future<Output = Result<String, TranscriptionError>> + Send + '_>> {
        Box::pin(self.call_api(upload))
    }
}
