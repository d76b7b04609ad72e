use super::traits::EntityDetector;
use super::types::{DetectedEntity, Scrubbed, SubstitutionMap, dedupe_overlapping};
use crate::error::DeidError;
use std::collections::HashMap;
use std::ops::Range;
use std::sync::Arc;

/// De-identification gateway: scrubs a batch of fields in one call.
///
/// All fields of one call share a single substitution map, so the same
/// original value gets the same token wherever it appears. Any detector
/// failure aborts the whole call; nothing partially scrubbed is returned.
#[derive(Clone)]
pub struct Scrubber {
    detector: Arc<dyn EntityDetector>,
    min_score: f64,
}

impl Scrubber {
    pub fn new(detector: Arc<dyn EntityDetector>, min_score: f64) -> Self {
        Self {
            detector,
            min_score,
        }
    }

    pub fn detector_name(&self) -> &str {
        self.detector.name()
    }

    pub async fn scrub(&self, fields: &[(&'static str, &str)]) -> Result<Scrubbed, DeidError> {
        let mut sub_map = SubstitutionMap::new();
        let mut value_to_token: HashMap<String, String> = HashMap::new();
        let mut type_counts: HashMap<String, usize> = HashMap::new();
        let mut scrubbed_fields = HashMap::with_capacity(fields.len());

        for &(name, text) in fields {
            if text.is_empty() {
                scrubbed_fields.insert(name, String::new());
                continue;
            }

            let detected = self.detector.analyze(text).await?;
            let mut spans = resolve_spans(text, detected, self.min_score)?;
            spans.sort_by_key(|(range, _)| range.start);

            let mut out = String::with_capacity(text.len());
            let mut cursor = 0;
            for (range, entity_type) in spans {
                let original = &text[range.clone()];
                let token = match value_to_token.get(original) {
                    Some(token) => token.clone(),
                    None => {
                        let count = type_counts.entry(entity_type.clone()).or_insert(0);
                        let token = format!("[{entity_type}_{count}]");
                        *count += 1;
                        value_to_token.insert(original.to_string(), token.clone());
                        sub_map.insert(token.clone(), original.to_string());
                        token
                    }
                };
                out.push_str(&text[cursor..range.start]);
                out.push_str(&token);
                cursor = range.end;
            }
            out.push_str(&text[cursor..]);
            scrubbed_fields.insert(name, out);
        }

        tracing::debug!(
            detector = self.detector.name(),
            fields = fields.len(),
            tokens = sub_map.len(),
            "deid.scrub"
        );

        Ok(Scrubbed::new(scrubbed_fields, sub_map))
    }
}

/// Filter by score, drop overlaps, and convert character offsets to byte ranges.
fn resolve_spans(
    text: &str,
    detected: Vec<DetectedEntity>,
    min_score: f64,
) -> Result<Vec<(Range<usize>, String)>, DeidError> {
    let candidates: Vec<DetectedEntity> = detected
        .into_iter()
        .filter(|e| e.score >= min_score)
        .collect();
    if candidates.is_empty() {
        return Ok(Vec::new());
    }

    let mut byte_offsets: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
    byte_offsets.push(text.len());

    dedupe_overlapping(candidates)
        .into_iter()
        .map(|entity| {
            if entity.start >= entity.end || entity.end >= byte_offsets.len() {
                return Err(DeidError::unavailable(format!(
                    "detector returned out-of-range span {}..{} for {}",
                    entity.start, entity.end, entity.entity_type
                )));
            }
            let range = byte_offsets[entity.start]..byte_offsets[entity.end];
            Ok((range, entity.entity_type))
        })
        .collect()
}
