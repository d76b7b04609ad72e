use super::prompts::{self, GhostWritePromptInput, excerpt};
use super::service::{CallStats, ScribeService, require};
use super::types::{GhostWriteRequest, GhostWritten};
use crate::audit::RequestContext;
use crate::error::ScribeError;
use std::time::Instant;

const FEATURE: &str = "scribe_ghost_write";
const ENDPOINT: &str = "/scribe/ghost-write";
const TEMPERATURE: f64 = 0.5;
const EXISTING_CONTENT_CHARS: usize = 300;

impl ScribeService {
    /// Ghost-Writer: rewrite an answer as note text in physician voice.
    ///
    /// The model's raw text is the result; there is no JSON contract.
    pub async fn ghost_write(
        &self,
        ctx: &RequestContext,
        request: GhostWriteRequest,
    ) -> Result<GhostWritten, ScribeError> {
        let started = Instant::now();
        let result = self.run_ghost_write(request).await;
        self.finish(ctx, FEATURE, ENDPOINT, started, result)
    }

    async fn run_ghost_write(
        &self,
        request: GhostWriteRequest,
    ) -> Result<(GhostWritten, CallStats), ScribeError> {
        require(
            &[request.chat_answer.as_str(), request.destination_section.as_str()],
            "chatAnswer and destinationSection are required",
        )?;

        let existing = excerpt(
            request.existing_content.as_deref().unwrap_or(""),
            EXISTING_CONTENT_CHARS,
        );
        let scrubbed = self
            .scrubber()
            .scrub(&[("answer", request.chat_answer.as_str()), ("existing_content", existing)])
            .await?;

        let messages = prompts::ghost_write(&GhostWritePromptInput {
            answer: scrubbed.field("answer"),
            destination_section: &request.destination_section,
            existing_content: scrubbed.field("existing_content"),
            note_type: &request.note_type,
            specialty: &request.specialty,
            verbosity: request.verbosity,
        });
        let reply = self.invoke(&messages, TEMPERATURE).await?;
        let stats = CallStats::new(&scrubbed.sub_map, &reply);

        let ghost_written = scrubbed.sub_map.reinject(reply.content.trim());
        Ok((GhostWritten { ghost_written }, stats))
    }
}
