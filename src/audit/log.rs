use super::traits::{AuditEvent, AuditSink};
use tracing::{info, warn};

/// Emits audit events on the `audit` tracing target.
pub struct LogAuditSink;

impl LogAuditSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogAuditSink {
    fn default() -> Self {
        Self::new()
    }
}

impl AuditSink for LogAuditSink {
    fn record(&self, event: &AuditEvent) {
        let patient = event.patient_id.as_deref().unwrap_or("-");
        let ip = event.ip.as_deref().unwrap_or("-");
        if event.success {
            info!(
                target: "audit",
                request_id = %event.request_id,
                timestamp = %event.timestamp.to_rfc3339(),
                user_id = %event.user_id,
                patient_id = %patient,
                feature = event.feature,
                endpoint = event.endpoint,
                ip = %ip,
                metadata = %event.metadata,
                "ai.usage"
            );
        } else {
            warn!(
                target: "audit",
                request_id = %event.request_id,
                timestamp = %event.timestamp.to_rfc3339(),
                user_id = %event.user_id,
                patient_id = %patient,
                feature = event.feature,
                endpoint = event.endpoint,
                ip = %ip,
                error = event.error.as_deref().unwrap_or("unknown"),
                metadata = %event.metadata,
                "ai.usage.failed"
            );
        }
    }

    fn name(&self) -> &str {
        "log"
    }
}
