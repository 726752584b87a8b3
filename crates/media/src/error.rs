//! Worker-fatal error type.

use sabqcha_core::{LectureId, QuizId, SolutionId};
use sabqcha_lectures::StoreError;

use crate::blob::BlobError;
use crate::tool::MediaToolError;
use crate::transcribe::TranscribeError;

/// Any failure inside a background worker run.
///
/// Fatal to the current run only: the dispatch guard logs it with the job id
/// and releases the claim; nothing is retried and no partial output is kept.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("lecture {0} not found")]
    LectureMissing(LectureId),
    #[error("quiz {0} not found")]
    QuizMissing(QuizId),
    #[error("solution {0} not found")]
    SolutionMissing(SolutionId),
    #[error("blob store: {0}")]
    Blob(#[from] BlobError),
    #[error("media tool: {0}")]
    Media(#[from] MediaToolError),
    #[error("transcription: {0}")]
    Transcribe(#[from] TranscribeError),
    #[error("generation: {0}")]
    Generate(#[from] sabqcha_ai::AiError),
    #[error("store: {0}")]
    Store(#[from] StoreError),
    #[error("scratch io: {0}")]
    Io(#[from] std::io::Error),
}
