use phiscribe::ClientError;
use phiscribe::batch::{
    BackendFuture, FocusedState, NoteContext, OTHER_OPTION, Phase, ScribePanel, SuggestionBackend,
};
use phiscribe::scribe::{
    Citation, FocusedRequest, FocusedResult, GhostWriteRequest, GhostWritten, ResolveRequest,
    ResolveResult, Section, Verbosity,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Scripted backend that records every call it receives.
#[derive(Default)]
struct ScriptedBackend {
    focused: Option<FocusedResult>,
    resolutions: HashMap<String, ResolveResult>,
    failing: Vec<String>,
    hang_focused: bool,
    hang_resolve: bool,
    calls: Mutex<Vec<String>>,
    ghost_answers: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn resolve_calls(&self) -> usize {
        self.calls().iter().filter(|c| c.starts_with("resolve:")).count()
    }
}

impl SuggestionBackend for ScriptedBackend {
    fn focused<'a>(&'a self, request: &'a FocusedRequest) -> BackendFuture<'a, FocusedResult> {
        Box::pin(async move {
            self.calls
                .lock()
                .unwrap()
                .push(format!("focused:{}", request.section_name));
            if self.hang_focused {
                std::future::pending::<()>().await;
            }
            self.focused.clone().ok_or(ClientError::Status {
                status: 500,
                message: "Failed to parse AI response".into(),
            })
        })
    }

    fn resolve<'a>(&'a self, request: &'a ResolveRequest) -> BackendFuture<'a, ResolveResult> {
        Box::pin(async move {
            self.calls
                .lock()
                .unwrap()
                .push(format!("resolve:{}", request.suggestion));
            if self.hang_resolve {
                std::future::pending::<()>().await;
            }
            if self.failing.contains(&request.suggestion) {
                return Err(ClientError::Status {
                    status: 500,
                    message: "model unavailable".into(),
                });
            }
            Ok(self
                .resolutions
                .get(&request.suggestion)
                .cloned()
                .unwrap_or(ResolveResult::Ready {
                    note_text: format!("Done: {}", request.suggestion),
                }))
        })
    }

    fn ghost_write<'a>(&'a self, request: &'a GhostWriteRequest) -> BackendFuture<'a, GhostWritten> {
        Box::pin(async move {
            self.calls.lock().unwrap().push("ghost_write".into());
            self.ghost_answers
                .lock()
                .unwrap()
                .push(request.chat_answer.clone());
            Ok(GhostWritten {
                ghost_written: format!("Written: {}", request.chat_answer),
            })
        })
    }
}

fn analysis() -> FocusedResult {
    FocusedResult {
        analysis: "Plan is thin.".into(),
        citations: vec![Citation {
            guideline: "ADA".into(),
            year: Some("2024".into()),
            recommendation: "Check A1c every 3 months".into(),
        }],
        suggestions: vec![
            "Add A1c target".into(),
            "Document foot exam".into(),
            "Add statin".into(),
        ],
        confidence_breakdown: None,
    }
}

fn plan_section() -> Section {
    let mut section = Section::new("s-plan", "Plan", 3);
    section.content = Some("Continue metformin.".into());
    section
}

fn context() -> NoteContext {
    NoteContext {
        transcript: "Patient reports good adherence.".into(),
        note_type: "progress".into(),
        specialty: "internal medicine".into(),
        verbosity: Verbosity::Standard,
    }
}

fn panel_with(backend: ScriptedBackend) -> (ScribePanel, Arc<ScriptedBackend>) {
    let backend = Arc::new(backend);
    let panel = ScribePanel::new(backend.clone(), context());
    (panel, backend)
}

fn backend() -> ScriptedBackend {
    ScriptedBackend {
        focused: Some(analysis()),
        ..ScriptedBackend::default()
    }
}

#[tokio::test]
async fn opening_a_section_loads_analysis_and_suggestions() {
    let (mut panel, backend) = panel_with(backend());
    panel.open_section(plan_section()).await;

    assert!(matches!(panel.view().state(), FocusedState::Ready(_)));
    let flow = panel.flow().expect("flow after analysis");
    assert_eq!(flow.suggestions().len(), 3);
    assert_eq!(backend.calls(), vec!["focused:Plan"]);
}

#[tokio::test]
async fn failed_analysis_leaves_no_flow() {
    let (mut panel, _backend) = panel_with(ScriptedBackend::default());
    panel.open_section(plan_section()).await;

    assert!(matches!(panel.view().state(), FocusedState::Failed(m) if m.contains("Failed to parse")));
    assert!(panel.flow().is_none());
}

#[tokio::test]
async fn single_ready_suggestion_previews_then_appends() {
    let (mut panel, backend) = panel_with(backend());
    panel.open_section(plan_section()).await;
    panel.start_single(1).await;

    let flow = panel.flow().unwrap();
    assert!(matches!(
        flow.phase(),
        Some(Phase::ReadyPreview { index: 1, note_text }) if note_text == "Done: Document foot exam"
    ));

    panel.confirm().await;
    let section = panel.section().unwrap();
    assert_eq!(
        section.content.as_deref(),
        Some("Continue metformin.\nDone: Document foot exam")
    );
    assert!(panel.flow().unwrap().is_applied(1));
    assert!(!panel.flow().unwrap().is_active());
    assert_eq!(backend.resolve_calls(), 1);
}

#[tokio::test]
async fn batch_runs_one_call_per_confirm_in_ascending_order() {
    let (mut panel, backend) = panel_with(backend());
    panel.open_section(plan_section()).await;
    panel.start_batch(&[2, 0]).await;

    assert_eq!(backend.resolve_calls(), 1);
    assert_eq!(panel.flow().unwrap().progress(), Some((1, 2)));

    panel.confirm().await;
    assert_eq!(backend.resolve_calls(), 2);
    assert_eq!(panel.flow().unwrap().progress(), Some((2, 2)));

    panel.confirm().await;
    assert_eq!(backend.resolve_calls(), 2);
    assert_eq!(
        backend.calls()[1..].to_vec(),
        vec!["resolve:Add A1c target", "resolve:Add statin"]
    );
    assert_eq!(
        panel.section().unwrap().content.as_deref(),
        Some("Continue metformin.\nDone: Add A1c target\nDone: Add statin")
    );
    assert!(!panel.flow().unwrap().is_active());
}

#[tokio::test]
async fn cancel_drops_remaining_queue() {
    let (mut panel, backend) = panel_with(backend());
    panel.open_section(plan_section()).await;
    panel.start_batch(&[0, 1, 2]).await;
    panel.cancel();

    let flow = panel.flow().unwrap();
    assert!(!flow.is_active());
    assert_eq!(flow.queued(), 0);

    panel.confirm().await;
    assert_eq!(backend.resolve_calls(), 1);
    assert_eq!(
        panel.section().unwrap().content.as_deref(),
        Some("Continue metformin.")
    );
}

#[tokio::test]
async fn canceller_aborts_in_flight_call() {
    let (mut panel, backend) = panel_with(ScriptedBackend {
        hang_resolve: true,
        ..backend()
    });
    panel.open_section(plan_section()).await;

    let token = panel.canceller();
    let canceller = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        token.cancel();
    });
    tokio::time::timeout(Duration::from_secs(5), panel.start_batch(&[0, 1]))
        .await
        .expect("cancelled call returns");
    canceller.await.unwrap();

    let flow = panel.flow().unwrap();
    assert!(!flow.is_active());
    assert_eq!(flow.queued(), 0);
    assert_eq!(backend.resolve_calls(), 1);
}

#[tokio::test]
async fn canceller_taken_before_open_aborts_focused_call() {
    let (mut panel, backend) = panel_with(ScriptedBackend {
        hang_focused: true,
        ..backend()
    });

    let token = panel.canceller();
    let canceller = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        token.cancel();
    });
    tokio::time::timeout(Duration::from_secs(5), panel.open_section(plan_section()))
        .await
        .expect("cancelled analysis returns");
    canceller.await.unwrap();

    assert!(matches!(panel.view().state(), FocusedState::Closed));
    assert!(panel.flow().is_none());
    assert_eq!(backend.calls(), vec!["focused:Plan"]);
}

#[tokio::test]
async fn fresh_canceller_works_after_an_abort() {
    let (mut panel, backend) = panel_with(ScriptedBackend {
        hang_resolve: true,
        ..backend()
    });
    panel.open_section(plan_section()).await;

    let spent = panel.canceller();
    panel.cancel();
    assert!(spent.is_cancelled());

    let token = panel.canceller();
    assert!(!token.is_cancelled());
    panel.open_section(plan_section()).await;
    let canceller = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        token.cancel();
    });
    tokio::time::timeout(Duration::from_secs(5), panel.start_single(0))
        .await
        .expect("cancelled call returns");
    canceller.await.unwrap();

    assert!(!panel.flow().unwrap().is_active());
    assert_eq!(backend.resolve_calls(), 1);
}

#[tokio::test]
async fn token_fired_while_idle_does_not_abort_next_call() {
    let (mut panel, backend) = panel_with(backend());
    panel.canceller().cancel();
    panel.open_section(plan_section()).await;

    assert!(matches!(panel.view().state(), FocusedState::Ready(_)));
    assert!(panel.flow().is_some());
    assert_eq!(backend.calls(), vec!["focused:Plan"]);
}

#[tokio::test]
async fn clarify_pill_routes_answer_to_ghost_writer() {
    let mut scripted = backend();
    scripted.resolutions.insert(
        "Add statin".into(),
        ResolveResult::Clarify {
            question: "Which intensity?".into(),
            options: vec!["Moderate".into(), "High".into()],
        },
    );
    let (mut panel, backend) = panel_with(scripted);
    panel.open_section(plan_section()).await;
    panel.start_single(2).await;

    assert_eq!(
        panel.flow().unwrap().pills(),
        vec!["Moderate", "High", OTHER_OPTION]
    );
    panel.select_pill(1).await;

    assert_eq!(
        *backend.ghost_answers.lock().unwrap(),
        vec!["Add statin. High.".to_string()]
    );
    assert!(matches!(
        panel.flow().unwrap().phase(),
        Some(Phase::ReadyPreview { note_text, .. }) if note_text == "Written: Add statin. High."
    ));
}

#[tokio::test]
async fn free_text_answer_is_trimmed_and_blank_is_ignored() {
    let mut scripted = backend();
    scripted.resolutions.insert(
        "Add statin".into(),
        ResolveResult::Clarify {
            question: "Which agent?".into(),
            options: vec!["Atorvastatin".into()],
        },
    );
    let (mut panel, backend) = panel_with(scripted);
    panel.open_section(plan_section()).await;
    panel.start_single(2).await;

    panel.select_pill(1).await;
    assert!(matches!(panel.flow().unwrap().phase(), Some(Phase::ClarifyFreeText(_))));

    panel.set_free_text("   ");
    panel.submit_free_text().await;
    assert!(backend.ghost_answers.lock().unwrap().is_empty());

    panel.back_to_pills();
    assert!(matches!(panel.flow().unwrap().phase(), Some(Phase::ClarifyPills(_))));
    panel.select_pill(1).await;
    panel.set_free_text("  rosuvastatin 10 mg ");
    panel.submit_free_text().await;

    assert_eq!(
        *backend.ghost_answers.lock().unwrap(),
        vec!["Add statin. rosuvastatin 10 mg.".to_string()]
    );
}

#[tokio::test]
async fn failure_mid_batch_clears_queue() {
    let (mut panel, backend) = panel_with(ScriptedBackend {
        failing: vec!["Document foot exam".into()],
        ..backend()
    });
    panel.open_section(plan_section()).await;
    panel.start_batch(&[0, 1, 2]).await;
    panel.confirm().await;

    let flow = panel.flow().unwrap();
    assert!(!flow.is_active());
    assert_eq!(flow.queued(), 0);
    assert!(flow.last_error().is_some_and(|e| e.contains("model unavailable")));
    assert!(flow.is_applied(0));
    assert_eq!(backend.resolve_calls(), 2);
}

#[tokio::test]
async fn citation_applies_once() {
    let (mut panel, _backend) = panel_with(backend());
    panel.open_section(plan_section()).await;

    assert!(panel.apply_citation(0));
    assert!(!panel.apply_citation(0));
    assert!(!panel.apply_citation(7));
    let content = panel.section().unwrap().content.clone().unwrap();
    assert!(content.contains("ADA"));
    assert!(content.contains("Check A1c every 3 months"));
}

#[tokio::test]
async fn closing_discards_flow() {
    let (mut panel, _backend) = panel_with(backend());
    panel.open_section(plan_section()).await;
    panel.close();

    assert!(panel.flow().is_none());
    assert!(matches!(panel.view().state(), FocusedState::Closed));
}
