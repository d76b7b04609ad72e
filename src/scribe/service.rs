use crate::audit::{AuditEvent, AuditSink, RequestContext};
use crate::config::Config;
use crate::deid::{PresidioDetector, Scrubber, SubstitutionMap};
use crate::error::ScribeError;
use crate::llm::{ChatMessage, ChatOptions, ModelReply, Provider, TokenUsage, create_provider};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// The four AI-backed note operations behind one de-identification gateway.
///
/// Stateless across requests: every call scrubs its own inputs, owns the
/// resulting substitution map, and drops it before returning.
pub struct ScribeService {
    provider: Arc<dyn Provider>,
    scrubber: Scrubber,
    audit: Arc<dyn AuditSink>,
    model: String,
    max_tokens: u32,
}

/// Accounting gathered during one operation, reported to the audit sink.
#[derive(Debug, Default)]
pub(crate) struct CallStats {
    tokens_scrubbed: usize,
    model: Option<String>,
    usage: Option<TokenUsage>,
}

impl CallStats {
    pub(crate) fn new(sub_map: &SubstitutionMap, reply: &ModelReply) -> Self {
        Self {
            tokens_scrubbed: sub_map.len(),
            model: reply.model.clone(),
            usage: reply.usage,
        }
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

impl ScribeService {
    pub fn new(
        provider: Arc<dyn Provider>,
        scrubber: Scrubber,
        audit: Arc<dyn AuditSink>,
        model: impl Into<String>,
        max_tokens: u32,
    ) -> Self {
        Self {
            provider,
            scrubber,
            audit,
            model: model.into(),
            max_tokens,
        }
    }

    /// Wire the configured provider and Presidio detector.
    pub fn from_config(config: &Config, audit: Arc<dyn AuditSink>) -> Result<Self, ScribeError> {
        let provider = create_provider(&config.llm)?;
        let detector = Arc::new(PresidioDetector::new(&config.deid));
        let scrubber = Scrubber::new(detector, config.deid.min_score);
        Ok(Self::new(
            provider,
            scrubber,
            audit,
            config.llm.model.clone(),
            config.llm.max_tokens,
        ))
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub(crate) fn scrubber(&self) -> &Scrubber {
        &self.scrubber
    }

    /// One model call. Callers pass only de-identified text.
    pub(crate) async fn invoke(
        &self,
        messages: &[ChatMessage],
        temperature: f64,
    ) -> Result<ModelReply, ScribeError> {
        let options = ChatOptions {
            model: self.model.clone(),
            temperature,
            max_tokens: self.max_tokens,
        };
        let started = Instant::now();
        let reply = self.provider.invoke(messages, &options).await?;
        debug!(
            provider = self.provider.name(),
            model = reply.model.as_deref().unwrap_or(&self.model),
            duration_ms = elapsed_ms(started),
            input_tokens = reply.usage.map(|u| u.input_tokens),
            output_tokens = reply.usage.map(|u| u.output_tokens),
            "llm.invoke"
        );
        Ok(reply)
    }

    /// Record the audit event for a finished operation and unwrap its value.
    pub(crate) fn finish<T>(
        &self,
        ctx: &RequestContext,
        feature: &'static str,
        endpoint: &'static str,
        started: Instant,
        result: Result<(T, CallStats), ScribeError>,
    ) -> Result<T, ScribeError> {
        let duration_ms = elapsed_ms(started);
        match result {
            Ok((value, stats)) => {
                let metadata = serde_json::json!({
                    "provider": self.provider.name(),
                    "model": stats.model.as_deref().unwrap_or(&self.model),
                    "duration_ms": duration_ms,
                    "tokens_scrubbed": stats.tokens_scrubbed,
                    "input_tokens": stats.usage.map(|u| u.input_tokens),
                    "output_tokens": stats.usage.map(|u| u.output_tokens),
                });
                info!(endpoint, duration_ms, "scribe.ok");
                self.audit
                    .record(&AuditEvent::new(ctx, feature, endpoint).with_metadata(metadata));
                Ok(value)
            }
            Err(err) => {
                if let ScribeError::Deid(deid) = &err {
                    warn!(endpoint, duration_ms, reason = deid.reason(), "scribe.deid_unavailable");
                } else {
                    warn!(endpoint, duration_ms, kind = err.kind(), error = %err, "scribe.failed");
                }
                let metadata = serde_json::json!({
                    "provider": self.provider.name(),
                    "duration_ms": duration_ms,
                    "kind": err.kind(),
                    "status": err.status(),
                });
                self.audit.record(
                    &AuditEvent::new(ctx, feature, endpoint)
                        .failed(err.to_string())
                        .with_metadata(metadata),
                );
                Err(err)
            }
        }
    }
}

/// Reject blank required fields before anything is scrubbed or sent.
pub(crate) fn require(values: &[&str], message: &str) -> Result<(), ScribeError> {
    if values.iter().any(|value| value.trim().is_empty()) {
        return Err(ScribeError::validation(message));
    }
    Ok(())
}
