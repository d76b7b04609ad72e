pub mod log;
pub mod memory;
pub mod noop;
pub mod traits;

pub use self::log::LogAuditSink;
pub use memory::MemoryAuditSink;
pub use noop::NoopAuditSink;
pub use traits::{AuditEvent, AuditSink, RequestContext};

use crate::config::AuditConfig;
use std::sync::Arc;

/// Factory: create the audit sink named by config.
pub fn create_audit_sink(config: &AuditConfig) -> Arc<dyn AuditSink> {
    match config.backend.as_str() {
        "none" | "noop" => Arc::new(NoopAuditSink),
        "log" => Arc::new(LogAuditSink::new()),
        other => {
            tracing::warn!(backend = other, "unknown audit backend, falling back to log");
            Arc::new(LogAuditSink::new())
        }
    }
}
