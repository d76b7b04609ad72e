use crate::support::{mount_presidio, mount_presidio_down};
use phiscribe::DeidError;
use phiscribe::config::DeidConfig;
use phiscribe::deid::{PresidioDetector, Scrubber};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn scrubber(server: &MockServer) -> Scrubber {
    let config = DeidConfig {
        analyzer_url: server.uri(),
        timeout_ms: 500,
        ..DeidConfig::default()
    };
    Scrubber::new(Arc::new(PresidioDetector::new(&config)), config.min_score)
}

#[tokio::test]
async fn analyzer_request_carries_language_entities_and_threshold() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze"))
        .and(body_partial_json(json!({
            "text": "No identifiers here.",
            "language": "en",
            "score_threshold": 0.7,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let scrubbed = scrubber(&server)
        .scrub(&[("content", "No identifiers here."), ("transcript", "")])
        .await
        .unwrap();
    assert_eq!(scrubbed.field("content"), "No identifiers here.");
    assert_eq!(scrubbed.field("transcript"), "");
    assert!(scrubbed.sub_map.is_empty());

    let received = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&received[0].body).unwrap();
    let entities = body["entities"].as_array().unwrap();
    assert!(entities.iter().any(|e| e == "PERSON"));
    assert!(entities.iter().any(|e| e == "US_SSN"));
}

#[tokio::test]
async fn shared_names_map_to_one_token_across_fields() {
    let server = MockServer::start().await;
    mount_presidio(&server, &["John Smith", "Mary Jones"]).await;

    let scrubbed = scrubber(&server)
        .scrub(&[
            ("content", "John Smith seen with Mary Jones."),
            ("transcript", "Mary Jones says John Smith fell."),
        ])
        .await
        .unwrap();

    assert_eq!(scrubbed.field("content"), "[PERSON_0] seen with [PERSON_1].");
    assert_eq!(scrubbed.field("transcript"), "[PERSON_1] says [PERSON_0] fell.");
    assert_eq!(scrubbed.sub_map.len(), 2);
    assert_eq!(
        scrubbed.sub_map.reinject("[PERSON_0] and [PERSON_1]"),
        "John Smith and Mary Jones"
    );
}

#[tokio::test]
async fn character_offsets_survive_multibyte_text() {
    let server = MockServer::start().await;
    mount_presidio(&server, &["José Núñez"]).await;

    let scrubbed = scrubber(&server)
        .scrub(&[("content", "Café visit · José Núñez, 42.")])
        .await
        .unwrap();
    assert_eq!(scrubbed.field("content"), "Café visit · [PERSON_0], 42.");
    assert_eq!(scrubbed.sub_map.get("[PERSON_0]"), Some("José Núñez"));
}

#[tokio::test]
async fn low_scores_are_ignored() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"entity_type": "PERSON", "start": 0, "end": 4, "score": 0.4}
        ])))
        .mount(&server)
        .await;

    let scrubbed = scrubber(&server).scrub(&[("content", "Mild headache")]).await.unwrap();
    assert_eq!(scrubbed.field("content"), "Mild headache");
}

#[tokio::test]
async fn non_2xx_fails_closed() {
    let server = MockServer::start().await;
    mount_presidio_down(&server).await;

    let err = scrubber(&server)
        .scrub(&[("content", "John Smith")])
        .await
        .unwrap_err();
    assert!(matches!(err, DeidError::ServiceUnavailable { .. }));
    assert!(!err.to_string().contains("overloaded"));
}

#[tokio::test]
async fn out_of_range_span_fails_closed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"entity_type": "PERSON", "start": 2, "end": 99, "score": 0.99}
        ])))
        .mount(&server)
        .await;

    let err = scrubber(&server).scrub(&[("content", "short")]).await.unwrap_err();
    assert!(err.reason().contains("out-of-range"));
}

#[tokio::test]
async fn garbage_body_fails_closed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy error</html>"))
        .mount(&server)
        .await;

    let result = scrubber(&server).scrub(&[("content", "John Smith")]).await;
    assert!(matches!(result, Err(DeidError::ServiceUnavailable { .. })));
}

#[tokio::test]
async fn timeout_fails_closed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let result = scrubber(&server).scrub(&[("content", "John Smith")]).await;
    assert!(matches!(result, Err(DeidError::ServiceUnavailable { .. })));
}

#[tokio::test]
async fn unreachable_analyzer_fails_closed() {
    let config = DeidConfig {
        analyzer_url: "http://127.0.0.1:9".into(),
        timeout_ms: 500,
        ..DeidConfig::default()
    };
    let scrubber = Scrubber::new(Arc::new(PresidioDetector::new(&config)), 0.7);
    let result = scrubber.scrub(&[("content", "John Smith")]).await;
    assert!(matches!(result, Err(DeidError::ServiceUnavailable { .. })));
}
