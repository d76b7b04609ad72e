//! Prompt text for every scribe operation.
//!
//! Several guarantees are enforced only here, at the prompt level: ICD-10
//! terminology, no commentary on transcription artifacts, verbatim token
//! preservation, and no escape-hatch clarify options. Tests assert on these
//! literals.

use super::types::{SectionSpec, Verbosity};
use crate::llm::ChatMessage;

pub const ICD10_INSTRUCTION: &str = "Use ICD-10-CM preferred terminology throughout. Examples: \
'essential (primary) hypertension' not 'high blood pressure'; \
'Type 2 diabetes mellitus' not 'diabetes' or 'diabetic'; \
specify systolic/diastolic and acute/chronic/acute-on-chronic for heart failure; \
'COPD with acute exacerbation' or 'COPD without acute exacerbation' not 'COPD' alone; \
'sequelae of CVA with [deficit]' not 'history of stroke' when deficits persist. \
Avoid vague clinical shorthand and 'history of [condition]' for conditions still actively managed.";

pub const TOKEN_PRESERVATION_INSTRUCTION: &str = "Text may contain privacy-protection tokens in [TYPE_N] format \
(e.g., [PERSON_0], [DATE_TIME_0], [MEDICAL_RECORD_NUMBER_0]). \
Preserve these tokens exactly as written. Do not translate, pluralize, rephrase, remove, \
or modify any bracketed token.";

pub const TRANSCRIPTION_ARTIFACT_INSTRUCTION: &str = "Never include notes about transcription quality, \
source artifacts, stray phrases picked up by the microphone, or any other non-clinical content from the raw audio text. \
Never include meta-commentary, caveats, or disclaimers.";

pub const ESCAPE_OPTION_INSTRUCTION: &str = "Options must be real, specific clinical values \
(e.g. \"Left MCA\", \"HFrEF\", \"EF 35%\"), not vague placeholders. \
Do NOT include escape options like \"Not yet determined\", \"Unknown\", \"TBD\", or \"Other\".";

pub const JSON_ONLY_INSTRUCTION: &str = "Return ONLY valid JSON. No markdown fences. No extra text.";

pub fn verbosity_instruction(verbosity: Verbosity) -> &'static str {
    match verbosity {
        Verbosity::Brief => {
            "Write in clinical shorthand using standard medical abbreviations. \
             Use sentence fragments, not complete sentences. \
             Style example: \"D/C CTX; start meropenem 1g IV q8h, renally adj. ID consult placed.\""
        }
        Verbosity::Standard => {
            "Write 1-2 concise clinical sentences. \
             Use medical abbreviations where natural (e.g., IV, q8h, D/C, s/p)."
        }
        Verbosity::Detailed => {
            "Write in complete clinical prose with full sentences. \
             Include clinical reasoning and context where relevant."
        }
    }
}

/// First `max_chars` characters of `text`, cut on a char boundary.
pub fn excerpt(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => &text[..cut],
        None => text,
    }
}

fn shared_rules() -> String {
    format!("{ICD10_INSTRUCTION}\n{TOKEN_PRESERVATION_INSTRUCTION}")
}

pub fn generate(
    specialty: &str,
    verbosity: Verbosity,
    transcript: &str,
    sections: &[SectionSpec],
) -> Vec<ChatMessage> {
    let section_list = sections
        .iter()
        .map(|s| match s.prompt_hint.as_deref().filter(|h| !h.trim().is_empty()) {
            Some(hint) => format!("- {} (Focus: {hint})", s.name),
            None => format!("- {}", s.name),
        })
        .collect::<Vec<_>>()
        .join("\n");

    let system = format!(
        "You are a clinical documentation AI assistant for a {specialty} physician.\n\
         Generate structured note content for each section listed below, based ONLY on the transcript provided.\n\
         Write in first-person plural physician voice (\"We assessed...\", \"The patient was...\", \"Our plan includes...\").\n\
         Be clinically precise. Do not fabricate findings not present in the transcript.\n\
         If a section cannot be completed from the transcript, write: \"Insufficient information captured.\"\n\
         {verbosity}\n\
         {TRANSCRIPTION_ARTIFACT_INSTRUCTION}\n\
         {rules}\n\
         {JSON_ONLY_INSTRUCTION}",
        verbosity = verbosity_instruction(verbosity),
        rules = shared_rules(),
    );

    let user = format!(
        "Transcript:\n\"{transcript}\"\n\n\
         Generate content for these sections, in this order:\n{section_list}\n\n\
         Return JSON with this exact structure:\n\
         {{\n  \"sections\": [\n    {{ \"name\": \"Section Name\", \"content\": \"Section text here\", \"confidence\": 0.0 }}\n  ]\n}}\n\
         Confidence is 0.0-1.0: 1.0 = fully supported by transcript, 0.0 = not in transcript at all."
    );

    vec![ChatMessage::system(system), ChatMessage::user(user)]
}

pub fn focused(
    specialty: &str,
    section_name: &str,
    content: &str,
    transcript_excerpt: &str,
) -> Vec<ChatMessage> {
    let system = format!(
        "You are a senior {specialty} physician AI providing expert clinical analysis.\n\
         Analyze the provided note section and return structured JSON only.\n\
         {rules}\n\
         {JSON_ONLY_INSTRUCTION}",
        rules = shared_rules(),
    );

    let transcript_part = if transcript_excerpt.is_empty() {
        String::new()
    } else {
        format!("\nOriginal transcript excerpt: \"{transcript_excerpt}\"")
    };

    let user = format!(
        "Analyze this note section and provide deep clinical insight.\n\n\
         Section: {section_name}\n\
         Content: \"{content}\"{transcript_part}\n\
         Specialty: {specialty}\n\n\
         Return JSON:\n\
         {{\n\
         \x20 \"analysis\": \"Expanded clinical reasoning and context for this section\",\n\
         \x20 \"citations\": [\n\
         \x20   {{ \"guideline\": \"Guideline name\", \"year\": \"2024\", \"recommendation\": \"Specific recommendation text\" }}\n\
         \x20 ],\n\
         \x20 \"suggestions\": [\"Clinically relevant item the note may be missing\"],\n\
         \x20 \"confidence_breakdown\": \"Which claims are well-supported vs inferred\"\n\
         }}\n\n\
         For ICU sections, cite: Surviving Sepsis Campaign, ARDS Network, PADIS guidelines, AHA/ACC, NCS.\n\
         For general medicine: ACC/AHA, IDSA, UpToDate-style evidence summaries.\n\
         Keep each field concise. Suggestions should be actionable one-liners."
    );

    vec![ChatMessage::system(system), ChatMessage::user(user)]
}

pub struct ResolvePromptInput<'a> {
    pub specialty: &'a str,
    pub verbosity: Verbosity,
    pub suggestion: &'a str,
    pub section_name: &'a str,
    pub note_type: &'a str,
    pub existing_content: &'a str,
    pub transcript: &'a str,
}

pub fn resolve(input: &ResolvePromptInput<'_>) -> Vec<ChatMessage> {
    let system = format!(
        "You are a clinical documentation AI for a {specialty} physician. \
         Your job is to convert a documentation suggestion into actual physician note text.\n\n\
         First, search the provided transcript and existing section content for the clinical detail referenced in the suggestion.\n\
         - If the detail is present or unambiguously inferable, write the note text and return ready=true.\n\
         - If a clinically critical detail is genuinely absent, return ready=false with a single focused clinical question \
         and the most clinically common, specific answers as options.\n\n\
         Rules for options when ready=false:\n\
         - Provide at least one option; three is typical.\n\
         - {ESCAPE_OPTION_INSTRUCTION}\n\n\
         Rules for note text when ready=true:\n\
         {verbosity}\n\
         {TRANSCRIPTION_ARTIFACT_INSTRUCTION}\n\
         Never include the suggestion text itself or guidance to the physician.\n\n\
         {rules}\n\
         {JSON_ONLY_INSTRUCTION}",
        specialty = input.specialty,
        verbosity = verbosity_instruction(input.verbosity),
        rules = shared_rules(),
    );

    let existing_part = if input.existing_content.is_empty() {
        String::new()
    } else {
        format!("\nExisting content:\n\"{}\"", input.existing_content)
    };
    let transcript_part = if input.transcript.is_empty() {
        String::new()
    } else {
        format!("\nTranscript:\n\"{}\"", input.transcript)
    };

    let user = format!(
        "Suggestion to resolve: \"{suggestion}\"\n\n\
         Section: {section}\n\
         Note type: {note_type}\n\
         Specialty: {specialty}{existing_part}{transcript_part}\n\n\
         Return one of these two JSON shapes:\n\
         {{ \"ready\": true, \"noteText\": \"...\" }}\n\
         {{ \"ready\": false, \"question\": \"...\", \"options\": [\"<value>\", \"<value>\", \"<value>\"] }}",
        suggestion = input.suggestion,
        section = input.section_name,
        note_type = input.note_type,
        specialty = input.specialty,
    );

    vec![ChatMessage::system(system), ChatMessage::user(user)]
}

pub struct GhostWritePromptInput<'a> {
    pub answer: &'a str,
    pub destination_section: &'a str,
    pub existing_content: &'a str,
    pub note_type: &'a str,
    pub specialty: &'a str,
    pub verbosity: Verbosity,
}

pub fn ghost_write(input: &GhostWritePromptInput<'_>) -> Vec<ChatMessage> {
    let system = format!(
        "You are a clinical documentation AI. Rewrite clinical information into physician note language.\n\
         Write in first-person physician voice, consistent with the existing note content, \
         as if the attending physician dictated it.\n\
         Output ONLY the note text: no explanation, no JSON, no markdown, no preamble.\n\
         {TRANSCRIPTION_ARTIFACT_INSTRUCTION}\n\
         {rules}",
        rules = shared_rules(),
    );

    let existing_part = if input.existing_content.is_empty() {
        String::new()
    } else {
        format!(
            "\nExisting section content (match this style):\n\"{}\"",
            input.existing_content
        )
    };

    let user = format!(
        "Convert the following clinical information into note text for the \"{section}\" section.\n\
         {verbosity}\n\
         Match the clinical density and writing style of the existing section content if provided.\n\n\
         Clinical information:\n\"{answer}\"\n\n\
         Note type: {note_type}\n\
         Specialty: {specialty}{existing_part}\n\n\
         Output ONLY the note text. Nothing else.",
        section = input.destination_section,
        verbosity = verbosity_instruction(input.verbosity),
        answer = input.answer,
        note_type = input.note_type,
        specialty = input.specialty,
    );

    vec![ChatMessage::system(system), ChatMessage::user(user)]
}
