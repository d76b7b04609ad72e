//! Client-side suggestion flow: focused analysis of one section, then single
//! or queued resolution of its suggestions, one call at a time.

pub mod client;
pub mod controller;
pub mod focused;
pub mod state;
pub mod traits;

pub use client::HttpScribeBackend;
pub use controller::ScribePanel;
pub use focused::{FocusedState, FocusedView, NoteContext};
pub use state::{BatchController, Clarification, Command, OTHER_OPTION, Phase, clarify_answer};
pub use traits::{BackendFuture, SuggestionBackend};
