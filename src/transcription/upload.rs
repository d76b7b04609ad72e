use crate::error::TranscriptionError;

/// Upload cap for one recording (25 MiB).
pub const MAX_AUDIO_BYTES: usize = 25 * 1024 * 1024;

/// Container formats browsers and mobile recorders produce.
pub const ALLOWED_MIME_TYPES: &[&str] = &[
    "audio/webm",
    "audio/wav",
    "audio/x-wav",
    "audio/wave",
    "audio/mp4",
    "audio/mpeg",
    "audio/ogg",
    "audio/x-m4a",
];

/// A validated audio recording ready to forward to the ASR service.
#[derive(Clone)]
pub struct AudioUpload {
    bytes: Vec<u8>,
    mime_type: String,
}

impl std::fmt::Debug for AudioUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioUpload")
            .field("mime_type", &self.mime_type)
            .field("size_bytes", &self.bytes.len())
            .finish()
    }
}

/// `audio/webm;codecs=opus` → `audio/webm`.
pub fn essence(mime_type: &str) -> String {
    mime_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase()
}

impl AudioUpload {
    /// Check emptiness, size and MIME type. The stored MIME type keeps its parameters.
    pub fn new(bytes: Vec<u8>, mime_type: &str) -> Result<Self, TranscriptionError> {
        if bytes.is_empty() {
            return Err(TranscriptionError::EmptyAudio);
        }
        if bytes.len() > MAX_AUDIO_BYTES {
            return Err(TranscriptionError::TooLarge {
                limit_bytes: MAX_AUDIO_BYTES,
            });
        }
        let base = essence(mime_type);
        if !ALLOWED_MIME_TYPES.contains(&base.as_str()) {
            return Err(TranscriptionError::UnsupportedMimeType(base));
        }
        Ok(Self {
            bytes,
            mime_type: mime_type.trim().to_string(),
        })
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// File extension the ASR service uses to pick a decoder.
    pub fn extension(&self) -> &'static str {
        let base = essence(&self.mime_type);
        if base.contains("webm") {
            "webm"
        } else if base.contains("mp4") || base.contains("m4a") {
            "mp4"
        } else if base.contains("mpeg") {
            "mp3"
        } else if base.contains("ogg") {
            "ogg"
        } else {
            "wav"
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}
