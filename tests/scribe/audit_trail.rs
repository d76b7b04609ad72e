use crate::fakes::{Harness, RecordingProvider, ctx};
use phiscribe::scribe::{GenerateRequest, ResolveRequest, SectionSpec, Verbosity};

fn request(transcript: &str) -> GenerateRequest {
    GenerateRequest {
        transcript: transcript.into(),
        sections: vec![SectionSpec::named("Assessment")],
        note_type: "progress".into(),
        verbosity: Verbosity::Standard,
        specialty: "general".into(),
    }
}

#[tokio::test]
async fn success_event_carries_accounting_only() {
    let h = Harness::new(
        RecordingProvider::replying(
            r#"{"sections":[{"name":"Assessment","content":"[PERSON_0] stable.","confidence":0.9}]}"#,
        ),
        &["John Smith"],
    );
    h.service
        .generate(&ctx(), request("John Smith is stable on lisinopril."))
        .await
        .unwrap();

    let events = h.audit.events();
    assert_eq!(events.len(), 1);
    let event = &events[0];
    assert!(event.success);
    assert_eq!(event.feature, "scribe_generate");
    assert_eq!(event.endpoint, "/scribe/generate");
    assert_eq!(event.user_id, "dr-test");
    assert_eq!(event.patient_id.as_deref(), Some("pt-42"));
    assert_eq!(event.ip.as_deref(), Some("10.0.0.7"));
    assert_eq!(event.metadata["provider"], "recording");
    assert_eq!(event.metadata["tokens_scrubbed"], 1);
    assert_eq!(event.metadata["input_tokens"], 120);

    let serialized = serde_json::to_string(event).unwrap();
    assert!(!serialized.contains("John Smith"));
    assert!(!serialized.contains("lisinopril"));
    assert!(!serialized.contains("stable"));
}

#[tokio::test]
async fn failures_are_audited_with_kind() {
    let h = Harness::deid_down(RecordingProvider::replying("{}"));
    let _ = h.service.generate(&ctx(), request("John Smith.")).await;

    let h2 = Harness::new(
        RecordingProvider::replying(r#"{"ready":false,"question":"Q?","options":[]}"#),
        &[],
    );
    let _ = h2
        .service
        .resolve_suggestion(
            &ctx(),
            ResolveRequest {
                suggestion: "Add laterality".into(),
                section_name: "Exam".into(),
                existing_content: None,
                transcript: None,
                note_type: "progress".into(),
                verbosity: Verbosity::Standard,
                specialty: "neurology".into(),
            },
        )
        .await;

    let deid_events = h.audit.events();
    assert_eq!(deid_events.len(), 1);
    assert!(!deid_events[0].success);
    assert_eq!(deid_events[0].metadata["kind"], "pii_service_unavailable");
    assert_eq!(deid_events[0].metadata["status"], 503);

    let resolve_events = h2.audit.events();
    assert_eq!(resolve_events[0].feature, "scribe_resolve");
    assert_eq!(resolve_events[0].metadata["kind"], "empty_options");
    assert!(!resolve_events[0].success);
}

#[tokio::test]
async fn validation_failures_are_audited_without_model_call() {
    let h = Harness::new(RecordingProvider::replying("{}"), &[]);
    let _ = h.service.generate(&ctx(), request("")).await;

    let events = h.audit.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].metadata["kind"], "validation");
    assert!(h.provider.calls().is_empty());
}
