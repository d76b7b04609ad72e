use super::upload::AudioUpload;
use crate::error::TranscriptionError;
use std::future::Future;
use std::pin::Pin;

/// Speech-to-text backend. Returns the transcript text.
pub trait Transcriber: Send + Sync {
    fn name(&self) -> &str;

    fn transcribe(
        &self,
        upload: AudioUpload,
    ) -> Pin<Box<dyn Future<Output = Result<String, TranscriptionError>> + Send + '_>>;
}
