use super::Config;
use crate::error::ConfigError;
use crate::llm::factory::{is_known_provider, requires_api_key, resolve_api_key};

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.deid.min_score) {
            return Err(ConfigError::Validation(format!(
                "deid.min_score must be within 0..=1, got {}",
                self.deid.min_score
            )));
        }

        if self.gateway.port == 0 {
            return Err(ConfigError::Validation(
                "gateway.port must be non-zero".into(),
            ));
        }

        if self.llm.model.trim().is_empty() {
            return Err(ConfigError::Validation("llm.model must not be empty".into()));
        }

        let provider = self.llm.provider.as_str();
        if !is_known_provider(provider) {
            return Err(ConfigError::Validation(format!(
                "llm.provider '{provider}' is not supported"
            )));
        }

        if requires_api_key(provider)
            && resolve_api_key(provider, self.llm.api_key.as_deref()).is_none()
        {
            return Err(ConfigError::Validation(format!(
                "llm.provider '{provider}' requires an API key"
            )));
        }

        if !matches!(self.audit.backend.as_str(), "log" | "none" | "noop") {
            return Err(ConfigError::Validation(format!(
                "audit.backend must be 'log' or 'none', got '{}'",
                self.audit.backend
            )));
        }

        for session in &self.auth.sessions {
            let hash = session.token_sha256.trim();
            if hash.len() != 64 || !hash.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(ConfigError::Validation(format!(
                    "auth.sessions entry for '{}' must hold a 64-char hex SHA-256",
                    session.user_id
                )));
            }
        }

        Ok(())
    }
}
