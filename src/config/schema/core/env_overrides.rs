use super::Config;

impl Config {
    pub fn apply_env_overrides(&mut self) {
        if let Ok(provider) = std::env::var("AI_PROVIDER")
            && !provider.trim().is_empty()
        {
            self.llm.provider = provider.trim().to_string();
        }

        if let Ok(model) = std::env::var("PHISCRIBE_MODEL")
            && !model.is_empty()
        {
            self.llm.model = model;
        }

        if let Ok(key) = std::env::var("PHISCRIBE_API_KEY")
            && !key.is_empty()
        {
            self.llm.api_key = Some(key);
        }

        if let Ok(port_str) = std::env::var("PHISCRIBE_PORT").or_else(|_| std::env::var("PORT"))
            && let Ok(port) = port_str.parse::<u16>()
        {
            self.gateway.port = port;
        }

        if let Ok(host) = std::env::var("PHISCRIBE_HOST")
            && !host.is_empty()
        {
            self.gateway.host = host;
        }

        if let Ok(url) = std::env::var("PRESIDIO_ANALYZER_URL")
            && !url.is_empty()
        {
            self.deid.analyzer_url = url;
        }

        if let Ok(timeout_str) = std::env::var("PRESIDIO_TIMEOUT_MS")
            && let Ok(timeout) = timeout_str.parse::<u64>()
        {
            self.deid.timeout_ms = timeout;
        }

        if let Ok(score_str) = std::env::var("PRESIDIO_MIN_SCORE")
            && let Ok(score) = score_str.parse::<f64>()
        {
            self.deid.min_score = score;
        }

        if let Ok(url) = std::env::var("WHISPER_API_URL")
            && !url.is_empty()
        {
            self.transcription.whisper_url = Some(url);
        }

        if let Ok(timeout_str) = std::env::var("WHISPER_TIMEOUT_MS")
            && let Ok(timeout) = timeout_str.parse::<u64>()
        {
            self.transcription.timeout_ms = timeout;
        }

        if let Ok(backend) = std::env::var("PHISCRIBE_AUDIT_BACKEND")
            && !backend.is_empty()
        {
            self.audit.backend = backend;
        }

        if let Ok(level) = std::env::var("PHISCRIBE_LOG_LEVEL")
            && !level.is_empty()
        {
            self.logging.level = level;
        }
    }
}
