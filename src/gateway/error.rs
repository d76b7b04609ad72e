use crate::error::{ScribeError, TranscriptionError};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// A [`ScribeError`] on its way out as `{"error": "<message>"}`.
#[derive(Debug)]
pub struct ApiError(pub ScribeError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.0.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl From<ScribeError> for ApiError {
    fn from(err: ScribeError) -> Self {
        Self(err)
    }
}

impl From<TranscriptionError> for ApiError {
    fn from(err: TranscriptionError) -> Self {
        Self(ScribeError::Transcription(err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.0.to_string() });
        (self.status(), Json(body)).into_response()
    }
}
