//! Session context
//!
//! Explicit, passed-by-reference state for one user interaction: the draft
//! request being assembled, debug toggles, branding, and the last generated
//! report. Replaces any ambient/global session state.

use chrono::{DateTime, Utc};

use threatlens_core::{
    AssessmentReport, Branding, ProjectInfo, ThreatlensResult, UploadedFile,
};
use threatlens_report::{normalize_document, AssessmentRequest, Framework, RiskArea};

use crate::generator::GenerationFailure;

/// Where the session is in its one-request lifecycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AssessmentStatus {
    #[default]
    Idle,
    Generating,
    Complete,
    Failed(GenerationFailure),
}

/// Draft request fields collected from the presentation layer
#[derive(Debug, Clone)]
pub struct AssessmentDraft {
    pub project: Option<ProjectInfo>,
    pub files: Vec<UploadedFile>,
    pub framework: Option<Framework>,
    pub risk_areas: Vec<RiskArea>,
}

impl Default for AssessmentDraft {
    fn default() -> Self {
        Self {
            project: None,
            files: Vec::new(),
            framework: None,
            // All risk areas are selected by default
            risk_areas: RiskArea::ALL.to_vec(),
        }
    }
}

impl AssessmentDraft {
    /// Build a validated request from the draft.
    ///
    /// Fails with a validation error naming the first missing field; runs
    /// before any remote call is attempted.
    pub fn build_request(&self) -> ThreatlensResult<AssessmentRequest> {
        let project = self.project.clone().ok_or_else(|| {
            threatlens_core::validation_error!(
                "Please complete the following: Project Name",
                "project name",
                "session"
            )
        })?;

        let framework = self.framework.ok_or_else(|| {
            threatlens_core::validation_error!(
                "Please complete the following: Threat Modeling Framework",
                "framework",
                "session"
            )
        })?;

        let request = AssessmentRequest {
            project,
            documents: self.files.iter().map(normalize_document).collect(),
            framework,
            risk_areas: self.risk_areas.clone(),
        };

        request.validate()?;
        Ok(request)
    }
}

/// Per-interaction session state
pub struct AssessmentSession {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
    /// The request being assembled
    pub draft: AssessmentDraft,
    /// Debug toggle: include a prompt preview in failure details
    pub show_prompt_preview: bool,
    /// Report branding for rendered output
    pub branding: Branding,
    /// The last generated report; None is the terminal "no result" state
    pub report: Option<AssessmentReport>,
    pub status: AssessmentStatus,
}

impl AssessmentSession {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            created_at: now,
            last_activity: now,
            draft: AssessmentDraft::default(),
            show_prompt_preview: false,
            branding: Branding::default(),
            report: None,
            status: AssessmentStatus::Idle,
        }
    }

    /// Update the last activity timestamp
    pub fn update_activity(&mut self) {
        self.last_activity = Utc::now();
    }

    /// Discard the current report and start a new assessment
    pub fn reset(&mut self) {
        self.report = None;
        self.status = AssessmentStatus::Idle;
        self.update_activity();
    }

    pub fn is_complete(&self) -> bool {
        self.status == AssessmentStatus::Complete && self.report.is_some()
    }
}

impl Default for AssessmentSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use threatlens_core::ThreatlensError;

    fn project() -> ProjectInfo {
        ProjectInfo {
            name: "Acme Portal".to_string(),
            app_type: "Web Application".to_string(),
            deployment: "Cloud (AWS)".to_string(),
            criticality: "High".to_string(),
            compliance: vec![],
            environment: "Production".to_string(),
        }
    }

    #[test]
    fn test_draft_defaults_select_all_risk_areas() {
        let draft = AssessmentDraft::default();
        assert_eq!(draft.risk_areas.len(), 5);
    }

    #[test]
    fn test_missing_framework_names_field() {
        let draft = AssessmentDraft {
            project: Some(project()),
            files: vec![UploadedFile::new("a.txt", b"notes".to_vec())],
            framework: None,
            ..Default::default()
        };

        match draft.build_request().unwrap_err() {
            ThreatlensError::Validation { field, .. } => {
                assert_eq!(field.as_deref(), Some("framework"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_documents_names_field() {
        let draft = AssessmentDraft {
            project: Some(project()),
            files: vec![],
            framework: Some(Framework::Stride),
            ..Default::default()
        };

        match draft.build_request().unwrap_err() {
            ThreatlensError::Validation { field, .. } => {
                assert_eq!(field.as_deref(), Some("documents"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_complete_draft_builds_normalized_request() {
        let draft = AssessmentDraft {
            project: Some(project()),
            files: vec![
                UploadedFile::new("arch.md", b"# Arch".to_vec()),
                UploadedFile::new("flows.png", vec![0x89]),
            ],
            framework: Some(Framework::Stride),
            risk_areas: vec![RiskArea::DataSecurity],
        };

        let request = draft.build_request().unwrap();
        assert_eq!(request.documents.len(), 2);
        assert_eq!(request.documents[0].content, "# Arch");
        assert_eq!(request.documents[1].content, "[PNG Document: flows.png]");
    }

    #[test]
    fn test_reset_discards_report() {
        let mut session = AssessmentSession::new();
        session.report = Some(AssessmentReport::new(
            "# Report".to_string(),
            "Acme".to_string(),
            "claude-sonnet-4-20250514".to_string(),
        ));
        session.status = AssessmentStatus::Complete;
        assert!(session.is_complete());

        session.reset();
        assert!(session.report.is_none());
        assert_eq!(session.status, AssessmentStatus::Idle);
    }
}
