use super::json::parse_model_json;
use super::prompts;
use super::service::{CallStats, ScribeService, require};
use super::types::{GenerateOutcome, GenerateRequest, GeneratedSection};
use crate::audit::RequestContext;
use crate::error::ScribeError;
use serde::Deserialize;
use std::time::Instant;

const FEATURE: &str = "scribe_generate";
const ENDPOINT: &str = "/scribe/generate";
const TEMPERATURE: f64 = 0.3;
const DEGRADED_CONFIDENCE: f64 = 0.5;

#[derive(Deserialize)]
struct ModelSections {
    sections: Vec<GeneratedSection>,
}

impl ScribeService {
    /// Section Generator: transcript → named sections with confidence.
    ///
    /// Output is not re-injected. An unparseable reply degrades to a single
    /// `Note` section holding the raw text, flagged with `parse_error`.
    pub async fn generate(
        &self,
        ctx: &RequestContext,
        request: GenerateRequest,
    ) -> Result<GenerateOutcome, ScribeError> {
        let started = Instant::now();
        let result = self.run_generate(request).await;
        self.finish(ctx, FEATURE, ENDPOINT, started, result)
    }

    async fn run_generate(
        &self,
        request: GenerateRequest,
    ) -> Result<(GenerateOutcome, CallStats), ScribeError> {
        require(&[request.transcript.as_str()], "transcript is required")?;
        if request.sections.is_empty() {
            return Err(ScribeError::validation(
                "sections array is required and must be non-empty",
            ));
        }

        let scrubbed = self
            .scrubber()
            .scrub(&[("transcript", request.transcript.as_str())])
            .await?;

        let messages = prompts::generate(
            &request.specialty,
            request.verbosity,
            scrubbed.field("transcript"),
            &request.sections,
        );
        let reply = self.invoke(&messages, TEMPERATURE).await?;
        let stats = CallStats::new(&scrubbed.sub_map, &reply);

        let outcome = match parse_model_json::<ModelSections>(&reply.content) {
            Some(parsed) => GenerateOutcome {
                sections: parsed.sections,
                parse_error: false,
            },
            None => {
                tracing::warn!(endpoint = ENDPOINT, "scribe.generate.parse_degraded");
                GenerateOutcome {
                    sections: vec![GeneratedSection {
                        name: "Note".into(),
                        content: reply.content,
                        confidence: Some(DEGRADED_CONFIDENCE),
                    }],
                    parse_error: true,
                }
            }
        };
        Ok((outcome, stats))
    }
}
