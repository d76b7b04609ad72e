use super::focused::{FocusedView, NoteContext};
use super::state::{BatchController, Command};
use super::traits::SuggestionBackend;
use crate::error::ClientError;
use crate::scribe::Section;
use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Async driver for one section panel: focused analysis, then single or
/// batched suggestion resolution.
///
/// Every network call goes through `&mut self`, so at most one is in flight.
/// A token from [`canceller`](Self::canceller) aborts that call from another
/// task; the aborted outcome is discarded and the remaining queue cleared.
pub struct ScribePanel {
    backend: Arc<dyn SuggestionBackend>,
    context: NoteContext,
    view: FocusedView,
    flow: Option<BatchController>,
    cancel: CancellationToken,
}

impl ScribePanel {
    pub fn new(backend: Arc<dyn SuggestionBackend>, context: NoteContext) -> Self {
        Self {
            backend,
            context,
            view: FocusedView::default(),
            flow: None,
            cancel: CancellationToken::new(),
        }
    }

    pub fn view(&self) -> &FocusedView {
        &self.view
    }

    pub fn flow(&self) -> Option<&BatchController> {
        self.flow.as_ref()
    }

    /// The section as edited so far, falling back to the one opened.
    pub fn section(&self) -> Option<&Section> {
        self.flow
            .as_ref()
            .map(BatchController::section)
            .or_else(|| self.view.section())
    }

    /// Token that aborts whichever call is in flight, including one started
    /// after the token was taken. Once fired it is spent; take a fresh one.
    pub fn canceller(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Fire the current token and hand out a fresh one.
    fn abort(&mut self) {
        self.cancel.cancel();
        self.cancel = CancellationToken::new();
    }

    /// Token for the next call. A token fired while idle has nothing to abort
    /// and is replaced.
    fn armed(&mut self) -> CancellationToken {
        if self.cancel.is_cancelled() {
            self.cancel = CancellationToken::new();
        }
        self.cancel.clone()
    }

    /// Await `call` unless the current token fires first.
    async fn guarded<T>(
        token: CancellationToken,
        call: impl Future<Output = Result<T, ClientError>>,
    ) -> Result<T, ClientError> {
        tokio::select! {
            biased;
            () = token.cancelled() => Err(ClientError::Cancelled),
            result = call => result,
        }
    }

    /// Open a section and run its focused analysis. Any earlier analysis or
    /// flow is abandoned.
    pub async fn open_section(&mut self, section: Section) {
        self.flow = None;
        let generation = self.view.open(section.clone());
        let request = self.context.focused_request(&section);

        let token = self.armed();
        let outcome = Self::guarded(token, self.backend.focused(&request)).await;
        if matches!(outcome, Err(ClientError::Cancelled)) {
            tracing::debug!("batch.focused.cancelled");
            self.close();
            return;
        }

        let outcome = outcome.map_err(|e| e.to_string());
        let suggestions = outcome.as_ref().ok().map(|r| r.suggestions.clone());
        if self.view.on_result(generation, outcome)
            && let Some(suggestions) = suggestions
        {
            self.flow = Some(BatchController::new(section, suggestions));
        }
    }

    /// Close the panel. An in-flight call is aborted and its result dropped.
    pub fn close(&mut self) {
        self.abort();
        self.view.close();
        self.flow = None;
    }

    pub async fn start_single(&mut self, index: usize) {
        let command = self.flow.as_mut().and_then(|f| f.start_single(index));
        self.execute(command).await;
    }

    pub async fn start_batch(&mut self, selected: &[usize]) {
        let command = self.flow.as_mut().and_then(|f| f.start_batch(selected));
        self.execute(command).await;
    }

    pub async fn select_pill(&mut self, pill: usize) {
        let command = self.flow.as_mut().and_then(|f| f.select_pill(pill));
        self.execute(command).await;
    }

    pub fn back_to_pills(&mut self) {
        if let Some(flow) = self.flow.as_mut() {
            flow.back_to_pills();
        }
    }

    pub fn set_free_text(&mut self, text: impl Into<String>) {
        if let Some(flow) = self.flow.as_mut() {
            flow.set_free_text(text);
        }
    }

    pub async fn submit_free_text(&mut self) {
        let command = self.flow.as_mut().and_then(BatchController::submit_free_text);
        self.execute(command).await;
    }

    /// Apply the preview; in a batch the next suggestion starts immediately.
    pub async fn confirm(&mut self) {
        let command = self.flow.as_mut().and_then(BatchController::confirm);
        self.execute(command).await;
    }

    /// Drop the current flow and the rest of the queue. No further calls are made.
    pub fn cancel(&mut self) {
        self.abort();
        if let Some(flow) = self.flow.as_mut() {
            flow.cancel();
        }
    }

    /// Append citation `index` of the current analysis to the section.
    pub fn apply_citation(&mut self, index: usize) -> bool {
        let Some(citation) = self
            .view
            .result()
            .and_then(|r| r.citations.get(index))
            .cloned()
        else {
            return false;
        };
        self.flow
            .as_mut()
            .is_some_and(|flow| flow.apply_citation(index, &citation))
    }

    async fn execute(&mut self, command: Option<Command>) {
        let Some(command) = command else { return };
        let Some(section) = self.flow.as_ref().map(|f| f.section().clone()) else {
            return;
        };
        let token = self.armed();

        match command {
            Command::Resolve {
                generation,
                suggestion,
                index,
            } => {
                tracing::debug!(index, generation, "batch.resolve");
                let request = self.context.resolve_request(&section, &suggestion);
                let outcome = Self::guarded(token, self.backend.resolve(&request)).await;
                if matches!(outcome, Err(ClientError::Cancelled)) {
                    self.cancel();
                } else if let Some(flow) = self.flow.as_mut() {
                    flow.on_resolved(generation, outcome.map_err(|e| e.to_string()));
                }
            }
            Command::GhostWrite {
                generation,
                answer,
                index,
            } => {
                tracing::debug!(index, generation, "batch.ghost_write");
                let request = self.context.ghost_write_request(&section, &answer);
                let outcome = Self::guarded(token, self.backend.ghost_write(&request)).await;
                if matches!(outcome, Err(ClientError::Cancelled)) {
                    self.cancel();
                } else if let Some(flow) = self.flow.as_mut() {
                    flow.on_ghost_written(
                        generation,
                        outcome.map(|g| g.ghost_written).map_err(|e| e.to_string()),
                    );
                }
            }
        }
    }
}
