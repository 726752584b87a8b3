//! AI boundary: question generation and solution scoring.
//!
//! This crate talks to an external OpenAI-compatible service and returns
//! typed payloads. It stays storage-agnostic: callers hand in transcripts
//! and documents, and persist the results themselves. Prompt content is
//! deliberately minimal; it is a boundary concern, not business logic.

pub mod generate;
pub mod prompts;
pub mod score;

pub use generate::{GeneratedMcq, McqBatch, OpenAiQuestionGenerator, QuestionGenerator};
pub use score::{OpenAiSolutionScorer, SolutionDocument, SolutionScorer};

/// Error talking to the generation/scoring service.
#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("ai service request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("ai service returned status {status}: {body}")]
    Status { status: u16, body: String },
    /// The service answered but the structured payload was missing or
    /// unparseable. Fatal for the calling worker.
    #[error("invalid response from ai service: {0}")]
    InvalidResponse(String),
}
