//! Axum HTTP surface for the scribe operations and audio transcription.
//!
//! - Session authentication on every route except `/health`
//! - JSON body cap on the scribe routes, a separate cap for audio uploads
//! - Per-request timeout covering scrub, model call and re-injection
//! - Credentialed CORS for the configured browser origins

mod auth;
mod error;
mod handlers;
mod server;
mod transcribe;

pub use auth::{Caller, SessionVerifier, StaticSessionVerifier, hash_token};
pub use error::ApiError;
pub use server::{build_app, build_state, run_gateway, run_gateway_with_listener};

use crate::scribe::ScribeService;
use crate::transcription::{MAX_AUDIO_BYTES, TranscriptionService};
use std::sync::Arc;

/// Multipart framing headroom on top of the audio cap.
pub const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;
/// Body cap for `/ai/transcribe`.
pub const MAX_UPLOAD_BODY_BYTES: usize = MAX_AUDIO_BYTES + MULTIPART_OVERHEAD_BYTES;

/// Shared state for all axum handlers
#[derive(Clone)]
pub struct AppState {
    pub scribe: Arc<ScribeService>,
    pub transcription: Arc<TranscriptionService>,
    pub sessions: Arc<dyn SessionVerifier>,
}
