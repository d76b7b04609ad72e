//! Pure suggestion-flow state machine.
//!
//! Nothing here performs I/O. Every transition that needs the network returns
//! a [`Command`] tagged with a generation id; the caller performs it and feeds
//! the outcome back. Outcomes carrying a stale generation are dropped, so a
//! cancelled or superseded call can never mutate state.

use crate::scribe::{Citation, ResolveResult, Section};
use std::collections::{BTreeSet, VecDeque};

/// Client-side pill that opens free-text entry. Never sent to the model.
pub const OTHER_OPTION: &str = "Other…";

/// A network call the state machine is waiting on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Resolve {
        generation: u64,
        index: usize,
        suggestion: String,
    },
    GhostWrite {
        generation: u64,
        index: usize,
        answer: String,
    },
}

impl Command {
    pub fn generation(&self) -> u64 {
        match self {
            Self::Resolve { generation, .. } | Self::GhostWrite { generation, .. } => *generation,
        }
    }
}

/// A pending clarification: the model's question and options for one suggestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clarification {
    pub index: usize,
    pub suggestion: String,
    pub question: String,
    pub options: Vec<String>,
    pub draft: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Analyzing { index: usize, suggestion: String },
    ReadyPreview { index: usize, note_text: String },
    ClarifyPills(Clarification),
    ClarifyFreeText(Clarification),
    GhostWriting { index: usize, answer: String },
}

impl Phase {
    pub fn index(&self) -> usize {
        match self {
            Self::Analyzing { index, .. }
            | Self::ReadyPreview { index, .. }
            | Self::GhostWriting { index, .. } => *index,
            Self::ClarifyPills(c) | Self::ClarifyFreeText(c) => c.index,
        }
    }
}

/// Answer routed to the Ghost-Writer after a clarification.
pub fn clarify_answer(suggestion: &str, choice: &str) -> String {
    format!("{suggestion}. {choice}.")
}

/// Suggestion flow for one section: single runs and sequential batches.
///
/// At most one call is outstanding at any time. Cancel discards the whole
/// remaining queue synchronously.
#[derive(Debug, Clone)]
pub struct BatchController {
    section: Section,
    suggestions: Vec<String>,
    phase: Option<Phase>,
    queue: VecDeque<usize>,
    total: usize,
    position: usize,
    applied: BTreeSet<usize>,
    applied_citations: BTreeSet<usize>,
    generation: u64,
    last_error: Option<String>,
}

impl BatchController {
    pub fn new(section: Section, suggestions: Vec<String>) -> Self {
        Self {
            section,
            suggestions,
            phase: None,
            queue: VecDeque::new(),
            total: 0,
            position: 0,
            applied: BTreeSet::new(),
            applied_citations: BTreeSet::new(),
            generation: 0,
            last_error: None,
        }
    }

    pub fn section(&self) -> &Section {
        &self.section
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn phase(&self) -> Option<&Phase> {
        self.phase.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.phase.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_applied(&self, index: usize) -> bool {
        self.applied.contains(&index)
    }

    pub fn applied(&self) -> impl Iterator<Item = usize> + '_ {
        self.applied.iter().copied()
    }

    /// Suggestion indices still eligible for a batch.
    pub fn unapplied(&self) -> Vec<usize> {
        (0..self.suggestions.len())
            .filter(|i| !self.applied.contains(i))
            .collect()
    }

    /// `(position, total)` while a batch runs.
    pub fn progress(&self) -> Option<(usize, usize)> {
        (self.total > 0 && self.phase.is_some()).then_some((self.position, self.total))
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Pills shown for a clarification: the model's options then [`OTHER_OPTION`].
    pub fn pills(&self) -> Vec<&str> {
        match &self.phase {
            Some(Phase::ClarifyPills(c)) => c
                .options
                .iter()
                .map(String::as_str)
                .chain(std::iter::once(OTHER_OPTION))
                .collect(),
            _ => Vec::new(),
        }
    }

    fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    fn analyze(&mut self, index: usize) -> Option<Command> {
        let suggestion = self.suggestions.get(index)?.clone();
        let generation = self.next_generation();
        self.phase = Some(Phase::Analyzing {
            index,
            suggestion: suggestion.clone(),
        });
        Some(Command::Resolve {
            generation,
            index,
            suggestion,
        })
    }

    fn reset(&mut self) {
        self.phase = None;
        self.queue.clear();
        self.total = 0;
        self.position = 0;
    }

    fn fail(&mut self, error: String) {
        self.reset();
        self.last_error = Some(error);
    }

    /// Run one suggestion without queue semantics. Ignored while a flow is active.
    pub fn start_single(&mut self, index: usize) -> Option<Command> {
        if self.is_active() || self.applied.contains(&index) || index >= self.suggestions.len() {
            return None;
        }
        self.last_error = None;
        self.reset();
        self.analyze(index)
    }

    /// Queue the selected suggestions in ascending order and start the first.
    ///
    /// Already applied, out-of-range and duplicate indices are dropped.
    /// Ignored while a flow is active.
    pub fn start_batch(&mut self, selected: &[usize]) -> Option<Command> {
        if self.is_active() {
            return None;
        }
        let indices: BTreeSet<usize> = selected
            .iter()
            .copied()
            .filter(|i| *i < self.suggestions.len() && !self.applied.contains(i))
            .collect();
        let mut queue: VecDeque<usize> = indices.into_iter().collect();
        let first = queue.pop_front()?;

        self.last_error = None;
        self.total = queue.len() + 1;
        self.position = 1;
        self.queue = queue;
        self.analyze(first)
    }

    /// Resolver outcome. Returns `false` when the outcome was stale and dropped.
    pub fn on_resolved(&mut self, generation: u64, outcome: Result<ResolveResult, String>) -> bool {
        if generation != self.generation {
            return false;
        }
        let (index, suggestion) = match self.phase.take() {
            Some(Phase::Analyzing { index, suggestion }) => (index, suggestion),
            other => {
                self.phase = other;
                return false;
            }
        };
        match outcome {
            Ok(ResolveResult::Ready { note_text }) => {
                self.phase = Some(Phase::ReadyPreview { index, note_text });
            }
            Ok(ResolveResult::Clarify { question, options }) => {
                self.phase = Some(Phase::ClarifyPills(Clarification {
                    index,
                    suggestion,
                    question,
                    options,
                    draft: String::new(),
                }));
            }
            Err(error) => self.fail(error),
        }
        true
    }

    /// Pick pill `pill` from [`pills`](Self::pills). The last pill opens free text.
    pub fn select_pill(&mut self, pill: usize) -> Option<Command> {
        let Some(Phase::ClarifyPills(clarification)) = &self.phase else {
            return None;
        };
        if pill == clarification.options.len() {
            if let Some(Phase::ClarifyPills(c)) = self.phase.take() {
                self.phase = Some(Phase::ClarifyFreeText(c));
            }
            return None;
        }
        let choice = clarification.options.get(pill)?.clone();
        self.ghost_write_with(&choice)
    }

    /// Free text back to pills. The clarification and draft are kept.
    pub fn back_to_pills(&mut self) {
        self.phase = match self.phase.take() {
            Some(Phase::ClarifyFreeText(c)) => Some(Phase::ClarifyPills(c)),
            other => other,
        };
    }

    pub fn set_free_text(&mut self, text: impl Into<String>) {
        if let Some(Phase::ClarifyFreeText(c)) = &mut self.phase {
            c.draft = text.into();
        }
    }

    /// Submit the typed answer. Blank text is ignored.
    pub fn submit_free_text(&mut self) -> Option<Command> {
        let Some(Phase::ClarifyFreeText(c)) = &self.phase else {
            return None;
        };
        let typed = c.draft.trim().to_string();
        if typed.is_empty() {
            return None;
        }
        self.ghost_write_with(&typed)
    }

    fn ghost_write_with(&mut self, choice: &str) -> Option<Command> {
        let (index, suggestion) = match &self.phase {
            Some(Phase::ClarifyPills(c) | Phase::ClarifyFreeText(c)) => (c.index, c.suggestion.clone()),
            _ => return None,
        };
        let answer = clarify_answer(&suggestion, choice);
        let generation = self.next_generation();
        self.phase = Some(Phase::GhostWriting {
            index,
            answer: answer.clone(),
        });
        Some(Command::GhostWrite {
            generation,
            index,
            answer,
        })
    }

    /// Ghost-Writer outcome. Returns `false` when the outcome was stale and dropped.
    pub fn on_ghost_written(&mut self, generation: u64, outcome: Result<String, String>) -> bool {
        if generation != self.generation {
            return false;
        }
        let index = match self.phase.take() {
            Some(Phase::GhostWriting { index, .. }) => index,
            other => {
                self.phase = other;
                return false;
            }
        };
        match outcome {
            Ok(note_text) => self.phase = Some(Phase::ReadyPreview { index, note_text }),
            Err(error) => self.fail(error),
        }
        true
    }

    /// Apply the previewed text and start the next queued suggestion, if any.
    pub fn confirm(&mut self) -> Option<Command> {
        let (index, note_text) = match self.phase.take() {
            Some(Phase::ReadyPreview { index, note_text }) => (index, note_text),
            other => {
                self.phase = other;
                return None;
            }
        };
        self.section.append(&note_text);
        self.applied.insert(index);

        match self.queue.pop_front() {
            Some(next) => {
                self.position += 1;
                self.analyze(next)
            }
            None => {
                self.reset();
                None
            }
        }
    }

    /// Abandon the current flow and the remaining queue. In-flight outcomes become stale.
    pub fn cancel(&mut self) {
        self.reset();
        self.generation += 1;
    }

    /// Append a citation to the section. Each citation applies once.
    pub fn apply_citation(&mut self, index: usize, citation: &Citation) -> bool {
        if !self.applied_citations.insert(index) {
            return false;
        }
        self.section.append(&citation.to_note_text());
        true
    }

    pub fn is_citation_applied(&self, index: usize) -> bool {
        self.applied_citations.contains(&index)
    }
}
