mod auth;
mod core;
mod deid;
mod gateway;
mod llm;
mod observability;
mod transcription;

pub use auth::{AuthConfig, SessionEntry};
pub use core::Config;
pub use deid::DeidConfig;
pub use gateway::GatewayConfig;
pub use llm::LlmConfig;
pub use observability::{AuditConfig, LoggingConfig};
pub use transcription::TranscriptionConfig;
