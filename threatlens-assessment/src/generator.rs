//! Assessment generation orchestration
//!
//! Drives one assessment end to end: validate the draft, compose the prompt,
//! call the model, augment references, and record the outcome on the session.
//! Remote failures stop at this boundary; the session ends up either with a
//! report or with a user-visible failure and no result.

use tracing::{debug, info, warn};

use threatlens_core::{AssessmentReport, ThreatlensResult};
use threatlens_llm::LlmClient;
use threatlens_report::{
    augment_references, compose_assessment_prompt, ReportArtifact, ReportExporter,
    ASSESSMENT_SYSTEM_PROMPT,
};

use crate::session::{AssessmentSession, AssessmentStatus};

/// Number of prompt characters included in debug previews
const PROMPT_PREVIEW_CHARS: usize = 300;

/// User-visible description of a failed generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationFailure {
    /// Short human-readable cause
    pub message: String,
    /// First part of the composed prompt; present only when the session has
    /// opted into debug previews, to avoid leaking request content by default
    pub prompt_preview: Option<String>,
}

/// Orchestrates prompt composition, the remote call and post-processing
pub struct AssessmentGenerator {
    client: LlmClient,
    exporter: ReportExporter,
}

impl AssessmentGenerator {
    pub fn new(client: LlmClient, exporter: ReportExporter) -> Self {
        Self { client, exporter }
    }

    /// Run one assessment for the session's draft.
    ///
    /// Validation problems are returned as errors before any remote call.
    /// Remote failures are recorded on the session as a `Failed` status with
    /// no report, and are not propagated further.
    pub async fn generate(&self, session: &mut AssessmentSession) -> ThreatlensResult<()> {
        let request = session.draft.build_request()?;

        session.status = AssessmentStatus::Generating;
        session.update_activity();

        let prompt = compose_assessment_prompt(&request);
        debug!(
            prompt_chars = prompt.len(),
            documents = request.documents.len(),
            framework = %request.framework,
            "Composed assessment prompt"
        );

        match self
            .client
            .generate_with_system(Some(ASSESSMENT_SYSTEM_PROMPT), &prompt)
            .await
        {
            Ok(text) => {
                let markdown = augment_references(&text);
                info!(
                    project = %request.project.name,
                    chars = markdown.len(),
                    "Assessment generated"
                );

                session.report = Some(AssessmentReport::new(
                    markdown,
                    request.project.name.clone(),
                    self.client.config().model.clone(),
                ));
                session.status = AssessmentStatus::Complete;
            }
            Err(e) => {
                warn!(error = %e, "Assessment generation failed");

                let prompt_preview = session.show_prompt_preview.then(|| {
                    prompt.chars().take(PROMPT_PREVIEW_CHARS).collect::<String>()
                });

                session.report = None;
                session.status = AssessmentStatus::Failed(GenerationFailure {
                    message: format!("Error generating threat assessment: {}", e),
                    prompt_preview,
                });
            }
        }

        session.update_activity();
        Ok(())
    }

    /// Export the session's report as a downloadable artifact
    pub fn export(&self, session: &AssessmentSession) -> Option<ReportArtifact> {
        session
            .report
            .as_ref()
            .map(|report| self.exporter.export(report, &session.branding))
    }
}
