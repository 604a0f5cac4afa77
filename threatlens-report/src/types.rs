//! Report type definitions

use serde::{Deserialize, Serialize};
use thiserror::Error;
use threatlens_core::{DocumentStub, ErrorContext, ProjectInfo, ThreatlensError};

use crate::catalog::{Framework, RiskArea};

/// Everything needed to compose one assessment prompt.
///
/// Constructed right before a generation call and not persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentRequest {
    pub project: ProjectInfo,
    pub documents: Vec<DocumentStub>,
    pub framework: Framework,
    pub risk_areas: Vec<RiskArea>,
}

impl AssessmentRequest {
    /// Check the request invariants: non-empty project name, at least one
    /// risk area, at least one document. Runs before any remote call.
    pub fn validate(&self) -> Result<(), ThreatlensError> {
        if self.project.name.trim().is_empty() {
            return Err(missing_field("Project Name", "project name"));
        }
        if self.risk_areas.is_empty() {
            return Err(missing_field("At least one Risk Focus Area", "risk areas"));
        }
        if self.documents.is_empty() {
            return Err(missing_field("Project Documents", "documents"));
        }
        Ok(())
    }
}

fn missing_field(label: &str, field: &str) -> ThreatlensError {
    ThreatlensError::Validation {
        message: format!("Please complete the following: {}", label),
        field: Some(field.to_string()),
        context: ErrorContext::new("assessment_request")
            .with_operation("validate")
            .with_suggestion("Complete the missing field before generating"),
    }
}

/// Content type of a produced artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentType {
    #[serde(rename = "text/markdown")]
    Markdown,
    #[serde(rename = "application/pdf")]
    Pdf,
}

impl ContentType {
    pub fn extension(&self) -> &'static str {
        match self {
            ContentType::Markdown => "md",
            ContentType::Pdf => "pdf",
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            ContentType::Markdown => "text/markdown",
            ContentType::Pdf => "application/pdf",
        }
    }
}

/// Artifact payload: binary for PDF, UTF-8 text for markdown
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactContent {
    Binary(Vec<u8>),
    Text(String),
}

impl ArtifactContent {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            ArtifactContent::Binary(bytes) => bytes,
            ArtifactContent::Text(text) => text.as_bytes(),
        }
    }
}

/// A downloadable report artifact
#[derive(Debug, Clone)]
pub struct ReportArtifact {
    /// Suggested download filename, date-stamped
    pub filename: String,
    pub content: ArtifactContent,
    pub content_type: ContentType,
    /// Why rendering degraded to markdown, when it did
    pub diagnostic: Option<String>,
}

/// Errors local to report post-processing
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Rendering error: {0}")]
    Render(String),

    #[error("Renderer unavailable: {0}")]
    RendererUnavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ReportResult<T> = Result<T, ReportError>;

impl From<ReportError> for ThreatlensError {
    fn from(err: ReportError) -> Self {
        ThreatlensError::Render {
            message: err.to_string(),
            source: Some(Box::new(err)),
            context: ErrorContext::new("report")
                .with_suggestion("Install wkhtmltopdf or download the markdown report instead"),
        }
    }
}
