use super::types::DetectedEntity;
use crate::error::DeidError;
use std::future::Future;
use std::pin::Pin;

/// External PHI detector (Presidio analyzer or equivalent).
///
/// Implementations must return `DeidError::ServiceUnavailable` for every
/// failure mode; callers treat that as fail-closed.
pub trait EntityDetector: Send + Sync {
    /// Detector identifier for logs.
    fn name(&self) -> &str;

    fn analyze<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<DetectedEntity>, DeidError>> + Send + 'a>>;
}
