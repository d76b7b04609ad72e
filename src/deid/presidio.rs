use super::traits::EntityDetector;
use super::types::DetectedEntity;
use crate::config::DeidConfig;
use crate::error::DeidError;
use reqwest::Client;
use serde::Serialize;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// Presidio analyzer client (`POST /analyze`).
pub struct PresidioDetector {
    analyze_url: String,
    language: String,
    entities: Vec<String>,
    score_threshold: f64,
    client: Client,
}

#[derive(Debug, Serialize)]
struct AnalyzeRequest<'a> {
    text: &'a str,
    language: &'a str,
    #[serde(skip_serializing_if = "no_entity_filter")]
    entities: &'a [String],
    score_threshold: f64,
}

fn no_entity_filter(entities: &&[String]) -> bool {
    entities.is_empty()
}

impl PresidioDetector {
    pub fn new(config: &DeidConfig) -> Self {
        let base = config.analyzer_url.trim().trim_end_matches('/');
        Self {
            analyze_url: format!("{base}/analyze"),
            language: config.language.clone(),
            entities: config.entities.clone(),
            score_threshold: config.min_score,
            client: Client::builder()
                .timeout(Duration::from_millis(config.timeout_ms))
                .connect_timeout(Duration::from_millis(config.timeout_ms.min(2_000)))
                .pool_max_idle_per_host(10)
                .pool_idle_timeout(Duration::from_secs(90))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    pub fn analyze_url(&self) -> &str {
        &self.analyze_url
    }

    async fn call_api(&self, text: &str) -> Result<Vec<DetectedEntity>, DeidError> {
        let request = AnalyzeRequest {
            text,
            language: &self.language,
            entities: &self.entities,
            score_threshold: self.score_threshold,
        };

        let response = self
            .client
            .post(&self.analyze_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| DeidError::unavailable(format!("presidio unreachable: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DeidError::unavailable(format!(
                "presidio analyzer returned {status}"
            )));
        }

        response
            .json::<Vec<DetectedEntity>>()
            .await
            .map_err(|e| DeidError::unavailable(format!("presidio response unreadable: {e}")))
    }
}

impl EntityDetector for PresidioDetector {
    fn name(&self) -> &str {
        "presidio"
    }

    fn analyze<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<DetectedEntity>, DeidError>> + Send + 'a>> {
        Box::pin(self.call_api(text))
    }
}
