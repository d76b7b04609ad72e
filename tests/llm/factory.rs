use phiscribe::LlmError;
use phiscribe::config::LlmConfig;
use phiscribe::llm::create_provider;

fn config(provider: &str) -> LlmConfig {
    LlmConfig {
        provider: provider.into(),
        api_key: Some("sk-test".into()),
        ..LlmConfig::default()
    }
}

#[test]
fn factory_builds_every_known_provider() {
    for (name, expected) in [
        ("anthropic", "anthropic"),
        ("openai", "openai"),
        ("openrouter", "openrouter"),
        ("ollama", "ollama"),
        ("custom:https://llm.internal/v1", "custom"),
    ] {
        let provider = create_provider(&config(name)).unwrap();
        assert_eq!(provider.name(), expected, "{name}");
    }
}

#[test]
fn factory_rejects_unknown_and_bare_custom() {
    assert!(matches!(
        create_provider(&config("mystery")),
        Err(LlmError::NotConfigured { .. })
    ));
    assert!(matches!(
        create_provider(&config("custom:")),
        Err(LlmError::NotConfigured { .. })
    ));
}
