#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::struct_field_names,
    clippy::must_use_candidate,
    clippy::new_without_default,
    clippy::return_self_not_must_use
)]

pub mod audit;
pub mod batch;
pub mod config;
pub mod deid;
pub mod error;
pub mod gateway;
pub mod llm;
pub mod scribe;
pub mod transcription;

pub use config::Config;
pub use error::{ClientError, ConfigError, DeidError, LlmError, ScribeError, TranscriptionError};
