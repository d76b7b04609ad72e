use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `phiscribe`.
///
/// Every variant maps to exactly one HTTP status through [`ScribeError::status`].
/// Messages are safe to return to callers: none of them embed transcript,
/// note content, or model output.
#[derive(Debug, Error)]
pub enum ScribeError {
    // ── Caller input ────────────────────────────────────────────────────
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthenticated(String),

    // ── De-identification ───────────────────────────────────────────────
    #[error(transparent)]
    Deid(#[from] DeidError),

    // ── LLM / Provider ──────────────────────────────────────────────────
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("model returned malformed output for {operation}: expected JSON")]
    UpstreamParse { operation: &'static str },

    #[error("model returned a clarification with no options")]
    EmptyOptions,

    // ── Transcription ───────────────────────────────────────────────────
    #[error(transparent)]
    Transcription(#[from] TranscriptionError),

    // ── Config ──────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ScribeError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// HTTP status code this error surfaces as.
    pub fn status(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Unauthenticated(_) => 401,
            Self::Deid(DeidError::ServiceUnavailable { .. }) => 503,
            Self::Transcription(err) if err.is_client_error() => 400,
            Self::Llm(_)
            | Self::UpstreamParse { .. }
            | Self::EmptyOptions
            | Self::Transcription(_)
            | Self::Config(_)
            | Self::Other(_) => 500,
        }
    }

    /// Short machine label used in audit events and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Unauthenticated(_) => "unauthenticated",
            Self::Deid(_) => "pii_service_unavailable",
            Self::Llm(_) => "upstream_model",
            Self::UpstreamParse { .. } => "upstream_parse",
            Self::EmptyOptions => "empty_options",
            Self::Transcription(_) => "transcription",
            Self::Config(_) => "config",
            Self::Other(_) => "internal",
        }
    }
}

// ─── De-identification errors ───────────────────────────────────────────────

pub const PII_UNAVAILABLE_MESSAGE: &str = "PII scrubbing service unavailable. Patient data cannot be sent to AI until de-identification is restored.";

#[derive(Debug, Error)]
pub enum DeidError {
    /// The detector could not be reached or returned something unusable.
    /// `reason` goes to logs only; the display text is fixed.
    #[error("{msg}", msg = PII_UNAVAILABLE_MESSAGE)]
    ServiceUnavailable { reason: String },
}

impl DeidError {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::ServiceUnavailable {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        match self {
            Self::ServiceUnavailable { reason } => reason,
        }
    }
}

// ─── LLM / Provider errors ──────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("provider {provider} request failed: {message}")]
    Request { provider: String, message: String },

    #[error("provider {provider} authentication failed")]
    Auth { provider: String },

    #[error("provider {provider} rate-limited")]
    RateLimited { provider: String },

    #[error("provider {provider} returned an unusable response: {message}")]
    InvalidResponse { provider: String, message: String },

    #[error("provider {provider} is not configured: {message}")]
    NotConfigured { provider: String, message: String },
}

// ─── Transcription errors ───────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum TranscriptionError {
    #[error("No audio file provided")]
    MissingFile,

    #[error("Empty audio buffer")]
    EmptyAudio,

    #[error("Unsupported audio type: {0}")]
    UnsupportedMimeType(String),

    #[error("Audio file exceeds {limit_bytes} byte limit")]
    TooLarge { limit_bytes: usize },

    #[error("Transcription service is not configured")]
    NotConfigured,

    #[error("Transcription service failed: {0}")]
    Upstream(String),
}

impl TranscriptionError {
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MissingFile | Self::EmptyAudio | Self::UnsupportedMimeType(_) | Self::TooLarge { .. }
        )
    }
}

// ─── Scribe client errors ───────────────────────────────────────────────────

/// Failures seen by the client side of the scribe API.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{message} ({status})")]
    Status { status: u16, message: String },

    #[error("scribe request failed: {0}")]
    Transport(String),

    #[error("unreadable scribe response: {0}")]
    Decode(String),

    #[error("request cancelled")]
    Cancelled,
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, ScribeError>;
