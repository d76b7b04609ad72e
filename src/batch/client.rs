use super::traits::{BackendFuture, SuggestionBackend};
use crate::error::ClientError;
use crate::llm::sanitize_api_error;
use crate::scribe::{
    FocusedRequest, FocusedResult, GhostWriteRequest, GhostWritten, ResolveRequest, ResolveResult,
};
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// [`SuggestionBackend`] over the gateway's HTTP API, authenticated with the
/// session cookie.
pub struct HttpScribeBackend {
    base_url: String,
    session_token: String,
    patient_id: Option<String>,
    client: Client,
}

impl HttpScribeBackend {
    pub fn new(base_url: &str, session_token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            session_token: session_token.into(),
            patient_id: None,
            client: Client::builder()
                .timeout(Duration::from_secs(180))
                .connect_timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    /// Attribute calls to a patient in the gateway's audit log.
    #[must_use]
    pub fn with_patient(mut self, patient_id: impl Into<String>) -> Self {
        self.patient_id = Some(patient_id.into());
        self
    }

    async fn post<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let mut request = self
            .client
            .post(format!("{}{path}", self.base_url))
            .header(
                reqwest::header::COOKIE,
                format!("scribe_token={}", self.session_token),
            )
            .json(body);
        if let Some(patient_id) = &self.patient_id {
            request = request.header("X-Patient-Id", patient_id);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<serde_json::Value>(&text)
                .ok()
                .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
                .unwrap_or_else(|| sanitize_api_error(&text));
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))
    }
}

impl SuggestionBackend for HttpScribeBackend {
    fn focused<'a>(&'a self, request: &'a FocusedRequest) -> BackendFuture<'a, FocusedResult> {
        Box::pin(self.post("/scribe/focused", request))
    }

    fn resolve<'a>(&'a self, request: &'a ResolveRequest) -> BackendFuture<'a, ResolveResult> {
        Box::pin(self.post("/scribe/resolve-suggestion", request))
    }

    fn ghost_write<'a>(&'a self, request: &'a GhostWriteRequest) -> BackendFuture<'a, GhostWritten> {
        Box::pin(self.post("/scribe/ghost-write", request))
    }
}
