use super::AppState;
use super::auth::Caller;
use super::error::ApiError;
use crate::error::ScribeError;
use crate::scribe::{
    FocusedRequest, FocusedResult, GenerateOutcome, GenerateRequest, GhostWriteRequest,
    GhostWritten, ResolveRequest, ResolveResult,
};
use axum::{
    extract::{State, rejection::JsonRejection},
    response::{IntoResponse, Json},
};

/// GET /health. Public; reports wiring only.
pub(super) async fn handle_health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "provider": state.scribe.provider_name(),
        "transcription": state.transcription.is_configured(),
    }))
}

/// Fixed text for a rejected body. serde's message quotes the offending
/// value, which may be patient text, so it never reaches the caller.
fn rejection_message(rejection: &JsonRejection) -> &'static str {
    match rejection {
        JsonRejection::JsonDataError(_) => "Invalid JSON: body does not match the expected shape",
        JsonRejection::JsonSyntaxError(_) => "Invalid JSON: body is not well-formed",
        JsonRejection::MissingJsonContentType(_) => {
            "Invalid JSON: expected Content-Type application/json"
        }
        _ => "Invalid JSON: body could not be read",
    }
}

fn parse_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(value)| value).map_err(|e| {
        tracing::debug!(status = e.status().as_u16(), "gateway.body_rejected");
        ApiError(ScribeError::validation(rejection_message(&e)))
    })
}

/// POST /scribe/generate
pub(super) async fn handle_generate(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    body: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateOutcome>, ApiError> {
    let request = parse_body(body)?;
    Ok(Json(state.scribe.generate(&ctx, request).await?))
}

/// POST /scribe/focused
pub(super) async fn handle_focused(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    body: Result<Json<FocusedRequest>, JsonRejection>,
) -> Result<Json<FocusedResult>, ApiError> {
    let request = parse_body(body)?;
    Ok(Json(state.scribe.focused(&ctx, request).await?))
}

/// POST /scribe/ghost-write
pub(super) async fn handle_ghost_write(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    body: Result<Json<GhostWriteRequest>, JsonRejection>,
) -> Result<Json<GhostWritten>, ApiError> {
    let request = parse_body(body)?;
    Ok(Json(state.scribe.ghost_write(&ctx, request).await?))
}

/// POST /scribe/resolve-suggestion
pub(super) async fn handle_resolve(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    body: Result<Json<ResolveRequest>, JsonRejection>,
) -> Result<Json<ResolveResult>, ApiError> {
    let request = parse_body(body)?;
    Ok(Json(state.scribe.resolve_suggestion(&ctx, request).await?))
}
