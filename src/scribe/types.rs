use crate::error::ScribeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub const DEFAULT_NOTE_TYPE: &str = "progress_note";
pub const DEFAULT_SPECIALTY: &str = "Medicine";

fn default_note_type() -> String {
    DEFAULT_NOTE_TYPE.into()
}

fn default_specialty() -> String {
    DEFAULT_SPECIALTY.into()
}

// ── Verbosity ────────────────────────────────────────────────────────────────

/// Note-text density. Unknown or null values read as `Standard`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "Option<String>")]
pub enum Verbosity {
    Brief,
    #[default]
    Standard,
    Detailed,
}

impl From<Option<String>> for Verbosity {
    fn from(value: Option<String>) -> Self {
        match value.as_deref().map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("brief") => Self::Brief,
            Some("detailed") => Self::Detailed,
            _ => Self::Standard,
        }
    }
}

/// Models send `null` for fields they have nothing for; read it as empty.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ── Requests ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_hint: Option<String>,
}

impl SectionSpec {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prompt_hint: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default)]
    pub transcript: String,
    #[serde(default)]
    pub sections: Vec<SectionSpec>,
    #[serde(default = "default_note_type")]
    pub note_type: String,
    #[serde(default)]
    pub verbosity: Verbosity,
    #[serde(default = "default_specialty")]
    pub specialty: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusedRequest {
    #[serde(default)]
    pub section_name: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub transcript: Option<String>,
    #[serde(default = "default_specialty")]
    pub specialty: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GhostWriteRequest {
    #[serde(default)]
    pub chat_answer: String,
    #[serde(default)]
    pub destination_section: String,
    #[serde(default)]
    pub existing_content: Option<String>,
    #[serde(default = "default_note_type")]
    pub note_type: String,
    #[serde(default = "default_specialty")]
    pub specialty: String,
    #[serde(default)]
    pub verbosity: Verbosity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveRequest {
    #[serde(default)]
    pub suggestion: String,
    #[serde(default)]
    pub section_name: String,
    #[serde(default)]
    pub existing_content: Option<String>,
    #[serde(default)]
    pub transcript: Option<String>,
    #[serde(default = "default_note_type")]
    pub note_type: String,
    #[serde(default)]
    pub verbosity: Verbosity,
    #[serde(default = "default_specialty")]
    pub specialty: String,
}

// ── Section Generator output ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedSection {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    /// Opaque model-supplied score, passed through untouched.
    #[serde(default)]
    pub confidence: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateOutcome {
    pub sections: Vec<GeneratedSection>,
    /// Set when the model's JSON could not be parsed and the raw text was wrapped.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub parse_error: bool,
}

// ── Focused Analyzer output ──────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub guideline: String,
    /// Models send the year as either a string or a number.
    #[serde(
        default,
        deserialize_with = "deserialize_year",
        skip_serializing_if = "Option::is_none"
    )]
    pub year: Option<String>,
    pub recommendation: String,
}

fn deserialize_year<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) if !s.trim().is_empty() => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

impl Citation {
    /// Text appended to a section when the clinician applies this citation.
    pub fn to_note_text(&self) -> String {
        match &self.year {
            Some(year) => format!(
                "Per {} ({}) guidelines: {}",
                self.guideline, year, self.recommendation
            ),
            None => format!("Per {} guidelines: {}", self.guideline, self.recommendation),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusedResult {
    #[serde(deserialize_with = "null_as_default")]
    pub analysis: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub citations: Vec<Citation>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub confidence_breakdown: Option<String>,
}

// ── Suggestion Resolver output ───────────────────────────────────────────────

/// Outcome of asking the model whether a suggestion can be written now.
///
/// Wire shape: `{ready:true, noteText}` or `{ready:false, question, options}`.
/// A clarify result always holds at least one option.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "ResolveWire")]
pub enum ResolveResult {
    Ready { note_text: String },
    Clarify { question: String, options: Vec<String> },
}

/// Loose shape accepted from the model before it is checked.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ResolveWire {
    pub ready: Option<bool>,
    pub note_text: Option<String>,
    pub question: Option<String>,
    pub options: Option<Vec<String>>,
}

impl TryFrom<ResolveWire> for ResolveResult {
    type Error = ScribeError;

    fn try_from(wire: ResolveWire) -> Result<Self, Self::Error> {
        if wire.options.as_ref().is_some_and(Vec::is_empty) {
            return Err(ScribeError::EmptyOptions);
        }
        match wire.ready {
            Some(true) => wire
                .note_text
                .map(|note_text| Self::Ready { note_text })
                .ok_or(ScribeError::UpstreamParse {
                    operation: "resolve-suggestion",
                }),
            Some(false) => {
                let options = wire.options.ok_or(ScribeError::EmptyOptions)?;
                let question = wire.question.ok_or(ScribeError::UpstreamParse {
                    operation: "resolve-suggestion",
                })?;
                Ok(Self::Clarify { question, options })
            }
            None => Err(ScribeError::UpstreamParse {
                operation: "resolve-suggestion",
            }),
        }
    }
}

impl Serialize for ResolveResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        match self {
            Self::Ready { note_text } => {
                let mut s = serializer.serialize_struct("ResolveResult", 2)?;
                s.serialize_field("ready", &true)?;
                s.serialize_field("noteText", note_text)?;
                s.end()
            }
            Self::Clarify { question, options } => {
                let mut s = serializer.serialize_struct("ResolveResult", 3)?;
                s.serialize_field("ready", &false)?;
                s.serialize_field("question", question)?;
                s.serialize_field("options", options)?;
                s.end()
            }
        }
    }
}

// ── Ghost-Writer output ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GhostWritten {
    pub ghost_written: String,
}

// ── Note sections ────────────────────────────────────────────────────────────

/// A note section as held by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    pub name: String,
    pub content: Option<String>,
    pub confidence: Option<f64>,
    pub display_order: u32,
}

impl Section {
    pub fn new(id: impl Into<String>, name: impl Into<String>, display_order: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            content: None,
            confidence: None,
            display_order,
        }
    }

    pub fn from_generated(id: impl Into<String>, generated: GeneratedSection, display_order: u32) -> Self {
        Self {
            id: id.into(),
            name: generated.name,
            content: Some(generated.content),
            confidence: generated.confidence,
            display_order,
        }
    }

    /// Append applied text. Existing content is never replaced.
    pub fn append(&mut self, text: &str) {
        self.content = Some(match self.content.take() {
            Some(existing) if !existing.is_empty() => format!("{existing}\n{text}"),
            _ => text.to_string(),
        });
    }

    pub fn content_or_empty(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }
}
