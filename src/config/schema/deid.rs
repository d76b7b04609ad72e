use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeidConfig {
    /// Presidio analyzer base URL (`/analyze` is appended).
    #[serde(default = "default_analyzer_url")]
    pub analyzer_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Detections scoring below this are left in the text.
    #[serde(default = "default_min_score")]
    pub min_score: f64,
    #[serde(default = "default_language")]
    pub language: String,
    /// Entity types requested from the analyzer. Empty asks for all.
    #[serde(default = "default_entities")]
    pub entities: Vec<String>,
}

fn default_analyzer_url() -> String {
    "http://localhost:5002".into()
}

fn default_timeout_ms() -> u64 {
    5_000
}

fn default_min_score() -> f64 {
    0.7
}

fn default_language() -> String {
    "en".into()
}

fn default_entities() -> Vec<String> {
    [
        "PERSON",
        "PHONE_NUMBER",
        "US_SSN",
        "DATE_TIME",
        "MEDICAL_RECORD_NUMBER",
        "US_DRIVER_LICENSE",
        "EMAIL_ADDRESS",
        "LOCATION",
        "AGE",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl Default for DeidConfig {
    fn default() -> Self {
        Self {
            analyzer_url: default_analyzer_url(),
            timeout_ms: default_timeout_ms(),
            min_score: default_min_score(),
            language: default_language(),
            entities: default_entities(),
        }
    }
}
