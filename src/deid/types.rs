use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// One span reported by the entity detector.
///
/// `start`/`end` are character offsets (not bytes), matching what Presidio
/// reports for Python strings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DetectedEntity {
    pub entity_type: String,
    pub start: usize,
    pub end: usize,
    pub score: f64,
}

impl DetectedEntity {
    pub fn new(entity_type: impl Into<String>, start: usize, end: usize, score: f64) -> Self {
        Self {
            entity_type: entity_type.into(),
            start,
            end,
            score,
        }
    }

    fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && self.end > other.start
    }

    fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }
}

/// Drop overlapping spans, keeping the highest score and, on ties, the longer span.
///
/// Two detector rules often match the same region (for example `DATE_TIME`
/// inside a date of birth); replacing both would corrupt the token.
pub fn dedupe_overlapping(entities: Vec<DetectedEntity>) -> Vec<DetectedEntity> {
    let mut sorted = entities;
    sorted.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| b.len().cmp(&a.len()))
    });

    let mut kept: Vec<DetectedEntity> = Vec::with_capacity(sorted.len());
    for entity in sorted {
        if !kept.iter().any(|k| entity.overlaps(k)) {
            kept.push(entity);
        }
    }
    kept
}

/// Token → original value, scoped to one logical operation.
///
/// Deliberately not `Clone`: a map is created by one scrub call, threaded by
/// value through prompt building and re-injection, and dropped with the
/// request. `Debug` prints only the entry count so the map can sit inside
/// logged structs without leaking PHI.
#[derive(Default)]
pub struct SubstitutionMap {
    entries: BTreeMap<String, String>,
}

impl SubstitutionMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, token: String, original: String) {
        self.entries.insert(token, original);
    }

    pub fn get(&self, token: &str) -> Option<&str> {
        self.entries.get(token).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Replace every occurrence of every token with its original value.
    ///
    /// Surrounding text may have been rewritten freely by the model; only the
    /// tokens themselves must survive verbatim.
    pub fn reinject(&self, text: &str) -> String {
        let mut result = text.to_string();
        for (token, original) in &self.entries {
            if result.contains(token.as_str()) {
                result = result.replace(token.as_str(), original);
            }
        }
        result
    }
}

impl fmt::Debug for SubstitutionMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubstitutionMap")
            .field("tokens", &self.entries.len())
            .finish()
    }
}

/// Output of one scrub call: de-identified fields plus the map that reverses them.
#[derive(Debug)]
pub struct Scrubbed {
    fields: HashMap<&'static str, String>,
    pub sub_map: SubstitutionMap,
}

impl Scrubbed {
    pub(crate) fn new(fields: HashMap<&'static str, String>, sub_map: SubstitutionMap) -> Self {
        Self { fields, sub_map }
    }

    /// De-identified value of `name`, or `""` when the field was not submitted.
    pub fn field(&self, name: &str) -> &str {
        self.fields.get(name).map_or("", String::as_str)
    }

    /// Split into the scrubbed fields and the substitution map.
    pub fn into_parts(self) -> (HashMap<&'static str, String>, SubstitutionMap) {
        (self.fields, self.sub_map)
    }
}
