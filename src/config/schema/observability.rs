use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// "log" | "none"
    pub backend: String,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            backend: "log".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// "trace" | "debug" | "info" | "warn" | "error"
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

impl LoggingConfig {
    pub fn max_level(&self) -> tracing::Level {
        self.level
            .trim()
            .parse::<tracing::Level>()
            .unwrap_or(tracing::Level::INFO)
    }
}
