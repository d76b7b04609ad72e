//! AI note operations: Section Generator, Focused Analyzer, Suggestion
//! Resolver and Ghost-Writer.
//!
//! Each operation runs scrub → prompt → invoke → parse → re-inject strictly in
//! sequence and emits one audit event whether it succeeds or fails.

pub mod focused;
pub mod generate;
pub mod ghost_write;
pub mod json;
pub mod prompts;
pub mod resolve;
pub mod service;
pub mod types;

pub use service::ScribeService;
pub use types::{
    Citation, FocusedRequest, FocusedResult, GenerateOutcome, GenerateRequest, GeneratedSection,
    GhostWriteRequest, GhostWritten, ResolveRequest, ResolveResult, Section, SectionSpec,
    Verbosity,
};
