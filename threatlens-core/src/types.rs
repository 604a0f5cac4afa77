//! Core data type definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Project metadata collected for one assessment request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectInfo {
    /// Project name (required, non-empty)
    pub name: String,
    /// Application type (e.g. "Web Application", "AI/ML Platform")
    pub app_type: String,
    /// Deployment model (e.g. "Cloud (AWS)", "On-Premises")
    pub deployment: String,
    /// Business criticality if the system is compromised
    pub criticality: String,
    /// Applicable compliance requirements
    pub compliance: Vec<String>,
    /// Target environment (Production, Staging, ...)
    pub environment: String,
}

impl ProjectInfo {
    /// Compliance requirements as listed in the prompt; "None specified"
    /// when the user selected nothing.
    pub fn compliance_list(&self) -> Vec<String> {
        if self.compliance.is_empty() {
            vec!["None specified".to_string()]
        } else {
            self.compliance.clone()
        }
    }
}

/// Short text representation of one uploaded document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentStub {
    /// Original file name as uploaded
    pub filename: String,
    /// Extracted text, or a placeholder/error stub for binary formats
    pub content: String,
}

/// An uploaded file before normalization
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// File size in bytes
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// The markdown report returned by the model for one assessment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentReport {
    /// Report body as markdown
    pub markdown: String,
    /// Project the report was generated for
    pub project_name: String,
    /// Model that produced the report
    pub model: String,
    /// Generation timestamp (report metadata only, never part of the prompt)
    pub generated_at: DateTime<Utc>,
}

impl AssessmentReport {
    pub fn new(markdown: String, project_name: String, model: String) -> Self {
        Self {
            markdown,
            project_name,
            model,
            generated_at: Utc::now(),
        }
    }
}

/// Optional branding applied to rendered reports
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Branding {
    /// Raw logo image bytes, embedded into the HTML shell as a data URI
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<Vec<u8>>,
    /// Company name shown in the report header
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    /// Footer text shown on every page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer_text: Option<String>,
}

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreatlensConfig {
    pub llm: LlmSettings,
    pub report: ReportSettings,
    pub logging: crate::logging::LoggingConfig,
}

/// Settings for the remote LLM API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// Model identifier
    pub model: String,
    /// Base URL of the API endpoint
    pub base_url: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Token budget for the response
    pub max_tokens: u32,
    /// Force the structured messages protocol regardless of model family
    pub force_messages: bool,
}

/// Settings for report rendering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSettings {
    /// Path to the HTML-to-PDF renderer binary
    pub renderer_path: String,
    /// Company name used when no per-session branding is set
    pub company_name: Option<String>,
    /// Footer text used when no per-session branding is set
    pub footer_text: Option<String>,
}
