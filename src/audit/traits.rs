use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Who made the call and from where. Supplied per request by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub user_id: String,
    pub patient_id: Option<String>,
    pub ip: Option<String>,
}

impl RequestContext {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_patient(mut self, patient_id: Option<String>) -> Self {
        self.patient_id = patient_id;
        self
    }

    #[must_use]
    pub fn with_ip(mut self, ip: Option<String>) -> Self {
        self.ip = ip;
        self
    }
}

/// One completed or failed AI operation.
///
/// Carries identifiers and accounting only; never transcript, note or model text.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    pub request_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub user_id: String,
    pub patient_id: Option<String>,
    pub feature: &'static str,
    pub endpoint: &'static str,
    pub ip: Option<String>,
    pub success: bool,
    pub error: Option<String>,
    pub metadata: serde_json::Value,
}

impl AuditEvent {
    pub fn new(ctx: &RequestContext, feature: &'static str, endpoint: &'static str) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            user_id: ctx.user_id.clone(),
            patient_id: ctx.patient_id.clone(),
            feature,
            endpoint,
            ip: ctx.ip.clone(),
            success: true,
            error: None,
            metadata: serde_json::Value::Null,
        }
    }

    #[must_use]
    pub fn failed(mut self, error: impl Into<String>) -> Self {
        self.success = false;
        self.error = Some(error.into());
        self
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Audit collaborator. Recording is fire-and-forget: implementations must
/// swallow their own failures so the response is never affected.
pub trait AuditSink: Send + Sync {
    fn record(&self, event: &AuditEvent);

    fn name(&self) -> &str;
}
