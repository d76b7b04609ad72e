use super::json::parse_model_json;
use super::prompts::{self, ResolvePromptInput, excerpt};
use super::service::{CallStats, ScribeService, require};
use super::types::{ResolveRequest, ResolveResult, ResolveWire};
use crate::audit::RequestContext;
use crate::deid::SubstitutionMap;
use crate::error::ScribeError;
use std::time::Instant;

const FEATURE: &str = "scribe_resolve";
const ENDPOINT: &str = "/scribe/resolve-suggestion";
const TEMPERATURE: f64 = 0.3;
const EXISTING_CONTENT_CHARS: usize = 400;
const TRANSCRIPT_CHARS: usize = 800;

impl ScribeService {
    /// Suggestion Resolver: either finished note text or one clarifying question.
    ///
    /// A clarify reply with zero options fails with [`ScribeError::EmptyOptions`];
    /// any non-empty option list passes through in the model's order.
    pub async fn resolve_suggestion(
        &self,
        ctx: &RequestContext,
        request: ResolveRequest,
    ) -> Result<ResolveResult, ScribeError> {
        let started = Instant::now();
        let result = self.run_resolve(request).await;
        self.finish(ctx, FEATURE, ENDPOINT, started, result)
    }

    async fn run_resolve(
        &self,
        request: ResolveRequest,
    ) -> Result<(ResolveResult, CallStats), ScribeError> {
        require(
            &[request.suggestion.as_str(), request.section_name.as_str()],
            "suggestion and sectionName are required",
        )?;

        let existing = excerpt(
            request.existing_content.as_deref().unwrap_or(""),
            EXISTING_CONTENT_CHARS,
        );
        let transcript = excerpt(request.transcript.as_deref().unwrap_or(""), TRANSCRIPT_CHARS);
        let scrubbed = self
            .scrubber()
            .scrub(&[
                ("suggestion", request.suggestion.as_str()),
                ("existing_content", existing),
                ("transcript", transcript),
            ])
            .await?;

        let messages = prompts::resolve(&ResolvePromptInput {
            specialty: &request.specialty,
            verbosity: request.verbosity,
            suggestion: scrubbed.field("suggestion"),
            section_name: &request.section_name,
            note_type: &request.note_type,
            existing_content: scrubbed.field("existing_content"),
            transcript: scrubbed.field("transcript"),
        });
        let reply = self.invoke(&messages, TEMPERATURE).await?;
        let stats = CallStats::new(&scrubbed.sub_map, &reply);

        let wire = parse_model_json::<ResolveWire>(&reply.content).ok_or(
            ScribeError::UpstreamParse {
                operation: "resolve-suggestion",
            },
        )?;
        let result = ResolveResult::try_from(wire)?;
        Ok((reinject_resolve(result, &scrubbed.sub_map), stats))
    }
}

fn reinject_resolve(result: ResolveResult, sub_map: &SubstitutionMap) -> ResolveResult {
    match result {
        ResolveResult::Ready { note_text } => ResolveResult::Ready {
            note_text: sub_map.reinject(&note_text),
        },
        ResolveResult::Clarify { question, options } => ResolveResult::Clarify {
            question: sub_map.reinject(&question),
            options: options.iter().map(|o| sub_map.reinject(o)).collect(),
        },
    }
}
