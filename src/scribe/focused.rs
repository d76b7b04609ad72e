use super::json::parse_model_json;
use super::prompts::{self, excerpt};
use super::service::{CallStats, ScribeService, require};
use super::types::{Citation, FocusedRequest, FocusedResult};
use crate::audit::RequestContext;
use crate::deid::SubstitutionMap;
use crate::error::ScribeError;
use std::time::Instant;

const FEATURE: &str = "scribe_focused";
const ENDPOINT: &str = "/scribe/focused";
const TEMPERATURE: f64 = 0.4;
const TRANSCRIPT_EXCERPT_CHARS: usize = 500;

impl ScribeService {
    /// Focused Analyzer: one section → analysis, citations, suggestions.
    pub async fn focused(
        &self,
        ctx: &RequestContext,
        request: FocusedRequest,
    ) -> Result<FocusedResult, ScribeError> {
        let started = Instant::now();
        let result = self.run_focused(request).await;
        self.finish(ctx, FEATURE, ENDPOINT, started, result)
    }

    async fn run_focused(
        &self,
        request: FocusedRequest,
    ) -> Result<(FocusedResult, CallStats), ScribeError> {
        require(
            &[request.section_name.as_str(), request.content.as_str()],
            "sectionName and content are required",
        )?;

        let transcript = excerpt(
            request.transcript.as_deref().unwrap_or(""),
            TRANSCRIPT_EXCERPT_CHARS,
        );
        let scrubbed = self
            .scrubber()
            .scrub(&[("content", request.content.as_str()), ("transcript", transcript)])
            .await?;

        let messages = prompts::focused(
            &request.specialty,
            &request.section_name,
            scrubbed.field("content"),
            scrubbed.field("transcript"),
        );
        let reply = self.invoke(&messages, TEMPERATURE).await?;
        let stats = CallStats::new(&scrubbed.sub_map, &reply);

        let parsed = parse_model_json::<FocusedResult>(&reply.content).ok_or(
            ScribeError::UpstreamParse {
                operation: "focused",
            },
        )?;
        Ok((reinject_focused(parsed, &scrubbed.sub_map), stats))
    }
}

fn reinject_focused(result: FocusedResult, sub_map: &SubstitutionMap) -> FocusedResult {
    FocusedResult {
        analysis: sub_map.reinject(&result.analysis),
        citations: result
            .citations
            .into_iter()
            .map(|c| Citation {
                guideline: sub_map.reinject(&c.guideline),
                year: c.year,
                recommendation: sub_map.reinject(&c.recommendation),
            })
            .collect(),
        suggestions: result
            .suggestions
            .iter()
            .map(|s| sub_map.reinject(s))
            .collect(),
        confidence_breakdown: result
            .confidence_breakdown
            .as_deref()
            .map(|b| sub_map.reinject(b)),
    }
}
