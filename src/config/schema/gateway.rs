use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Gateway host (default: 127.0.0.1)
    #[serde(default = "default_gateway_host")]
    pub host: String,
    /// Gateway port (default: 3001)
    #[serde(default = "default_gateway_port")]
    pub port: u16,
    /// Browser origins allowed to call with credentials. Empty disables CORS.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
    /// Per-request timeout, covering the scrub, model call and re-injection.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// JSON body cap for the scribe routes. The transcription route has its own cap.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_gateway_host() -> String {
    "127.0.0.1".into()
}

fn default_gateway_port() -> u16 {
    3001
}

fn default_request_timeout_secs() -> u64 {
    120
}

fn default_max_body_bytes() -> usize {
    1_048_576
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_gateway_host(),
            port: default_gateway_port(),
            allowed_origins: Vec::new(),
            request_timeout_secs: default_request_timeout_secs(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}
