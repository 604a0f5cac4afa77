//! Threatlens Report - prompt composition and report post-processing
//!
//! This crate holds the static threat-modeling catalog, the document
//! normalizer, the assessment prompt composer, and the post-processing
//! pipeline that turns the model's markdown into a downloadable artifact.

pub mod catalog;
pub mod documents;
pub mod export;
pub mod prompts;
pub mod references;
pub mod types;

pub use catalog::{Framework, RiskArea};
pub use documents::normalize_document;
pub use export::ReportExporter;
pub use prompts::{compose_assessment_prompt, ASSESSMENT_SYSTEM_PROMPT};
pub use references::augment_references;
pub use types::{
    ArtifactContent, AssessmentRequest, ContentType, ReportArtifact, ReportError, ReportResult,
};
