//! Threatlens Assessment - session context and generation orchestration
//!
//! Ties the prompt composer, the LLM client and the report post-processor
//! together behind an explicit per-interaction session object.

pub mod generator;
pub mod session;

pub use generator::{AssessmentGenerator, GenerationFailure};
pub use session::{AssessmentDraft, AssessmentSession, AssessmentStatus};
