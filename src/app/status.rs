use phiscribe::Config;

/// Human-readable summary of the effective config. Secrets are never printed.
pub fn render_status(config: &Config) -> String {
    let mut lines = vec![
        "◆ phiscribe config OK".to_string(),
        String::new(),
        format!("Version     {}", env!("CARGO_PKG_VERSION")),
        format!("Config      {}", config.config_path.display()),
        String::new(),
        format!(
            "Gateway     {}:{}",
            config.gateway.host, config.gateway.port
        ),
        format!("Provider    {}", config.llm.provider),
        format!("Model       {}", config.llm.model),
        format!(
            "API key     {}",
            if phiscribe::llm::resolve_api_key(&config.llm.provider, config.llm.api_key.as_deref())
                .is_some()
            {
                "set"
            } else {
                "not set"
            }
        ),
        format!(
            "Presidio    {} (min score {:.2})",
            config.deid.analyzer_url, config.deid.min_score
        ),
        format!(
            "Whisper     {}",
            config
                .transcription
                .whisper_url
                .as_deref()
                .unwrap_or("disabled")
        ),
        format!("Audit       {}", config.audit.backend),
        format!("Sessions    {}", config.auth.sessions.len()),
    ];

    if !config.gateway.allowed_origins.is_empty() {
        lines.push(format!(
            "CORS        {}",
            config.gateway.allowed_origins.join(", ")
        ));
    }

    lines.join("\n")
}
