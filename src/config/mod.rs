pub mod schema;

pub use schema::{
    AuditConfig, AuthConfig, Config, DeidConfig, GatewayConfig, LlmConfig, LoggingConfig,
    SessionEntry, TranscriptionConfig,
};
