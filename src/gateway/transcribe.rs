use super::AppState;
use super::auth::Caller;
use super::error::ApiError;
use crate::error::{ScribeError, TranscriptionError};
use crate::transcription::{AudioUpload, MAX_AUDIO_BYTES};
use axum::{
    extract::{Multipart, State, multipart::{MultipartError, MultipartRejection}},
    http::StatusCode,
    response::Json,
};

const AUDIO_FIELD: &str = "audio";

fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::from(TranscriptionError::TooLarge {
            limit_bytes: MAX_AUDIO_BYTES,
        })
    } else {
        ApiError(ScribeError::validation("Malformed multipart upload"))
    }
}

async fn read_audio(multipart: &mut Multipart) -> Result<AudioUpload, ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(AUDIO_FIELD) {
            continue;
        }
        let mime_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field.bytes().await.map_err(multipart_error)?;
        return Ok(AudioUpload::new(bytes.to_vec(), &mime_type)?);
    }
    Err(TranscriptionError::MissingFile.into())
}

/// POST /ai/transcribe with multipart field `audio`.
pub(super) async fn handle_transcribe(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut multipart = multipart
        .map_err(|_| ApiError(ScribeError::validation("Expected multipart/form-data")))?;
    let upload = read_audio(&mut multipart).await?;
    let transcript = state.transcription.transcribe(&ctx, upload).await?;
    Ok(Json(serde_json::json!({ "transcript": transcript })))
}
