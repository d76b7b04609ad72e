//! PHI de-identification gateway.
//!
//! Every field bound for a model goes through one [`Scrubber::scrub`] call;
//! model output comes back through [`SubstitutionMap::reinject`] using the
//! map that same call produced.

pub mod presidio;
pub mod scrubber;
pub mod traits;
pub mod types;

pub use presidio::PresidioDetector;
pub use scrubber::Scrubber;
pub use traits::EntityDetector;
pub use types::{DetectedEntity, Scrubbed, SubstitutionMap, dedupe_overlapping};
