//! Focused-analysis view state and request shaping for one open section.

use crate::scribe::prompts::excerpt;
use crate::scribe::{
    FocusedRequest, FocusedResult, GhostWriteRequest, ResolveRequest, Section, Verbosity,
};

/// Transcript sent with a focused analysis request.
pub const FOCUSED_TRANSCRIPT_CHARS: usize = 1000;
/// Transcript sent with a resolve request.
pub const RESOLVE_TRANSCRIPT_CHARS: usize = 800;

/// Note-level context shared by every request the panel makes.
#[derive(Debug, Clone)]
pub struct NoteContext {
    pub transcript: String,
    pub note_type: String,
    pub specialty: String,
    pub verbosity: Verbosity,
}

impl NoteContext {
    pub fn focused_request(&self, section: &Section) -> FocusedRequest {
        FocusedRequest {
            section_name: section.name.clone(),
            content: section.content_or_empty().to_string(),
            transcript: Some(excerpt(&self.transcript, FOCUSED_TRANSCRIPT_CHARS).to_string()),
            specialty: self.specialty.clone(),
        }
    }

    pub fn resolve_request(&self, section: &Section, suggestion: &str) -> ResolveRequest {
        ResolveRequest {
            suggestion: suggestion.to_string(),
            section_name: section.name.clone(),
            existing_content: Some(section.content_or_empty().to_string()),
            transcript: Some(excerpt(&self.transcript, RESOLVE_TRANSCRIPT_CHARS).to_string()),
            note_type: self.note_type.clone(),
            verbosity: self.verbosity,
            specialty: self.specialty.clone(),
        }
    }

    pub fn ghost_write_request(&self, section: &Section, answer: &str) -> GhostWriteRequest {
        GhostWriteRequest {
            chat_answer: answer.to_string(),
            destination_section: section.name.clone(),
            existing_content: Some(section.content_or_empty().to_string()),
            note_type: self.note_type.clone(),
            specialty: self.specialty.clone(),
            verbosity: self.verbosity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FocusedState {
    #[default]
    Closed,
    Loading,
    Ready(FocusedResult),
    Failed(String),
}

/// Which section is open and the analysis shown for it.
///
/// Each open gets a fresh generation; a result for any other generation is
/// dropped, so closing or switching sections makes in-flight analyses inert.
#[derive(Debug, Clone, Default)]
pub struct FocusedView {
    generation: u64,
    section: Option<Section>,
    state: FocusedState,
}

impl FocusedView {
    pub fn open(&mut self, section: Section) -> u64 {
        self.generation += 1;
        self.section = Some(section);
        self.state = FocusedState::Loading;
        self.generation
    }

    pub fn close(&mut self) {
        self.generation += 1;
        self.section = None;
        self.state = FocusedState::Closed;
    }

    pub fn on_result(&mut self, generation: u64, outcome: Result<FocusedResult, String>) -> bool {
        if generation != self.generation || self.state != FocusedState::Loading {
            return false;
        }
        self.state = match outcome {
            Ok(result) => FocusedState::Ready(result),
            Err(error) => FocusedState::Failed(error),
        };
        true
    }

    pub fn section(&self) -> Option<&Section> {
        self.section.as_ref()
    }

    pub fn state(&self) -> &FocusedState {
        &self.state
    }

    pub fn result(&self) -> Option<&FocusedResult> {
        match &self.state {
            FocusedState::Ready(result) => Some(result),
            _ => None,
        }
    }
}
