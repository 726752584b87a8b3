//! Media pipeline: download, chunk, transcribe, aggregate, generate.
//!
//! The transcription worker splits one lecture recording into fixed-length
//! clips, transcribes the clips concurrently against a rate-limited external
//! service, reassembles the transcript in timeline order, and hands it to
//! question generation. The grading worker is a smaller sibling: download
//! one solution, score it, persist the grade.
//!
//! Both workers are payloads for `sabqcha_jobs::DispatchGuard`; they return
//! `Result` and never touch the job ledger themselves.

pub mod blob;
pub mod chunk;
pub mod error;
pub mod grading;
pub mod pipeline;
pub mod tool;
pub mod transcribe;

pub use blob::{BlobError, BlobStore, LocalBlobStore};
pub use chunk::{aggregate_transcripts, plan_chunks, ChunkWindow, CHUNK_LEN_SECS, MAX_AUDIO_DURATION_SECS};
pub use error::PipelineError;
pub use grading::{GradeQuizArgs, GradingWorker};
pub use pipeline::{PipelineLimits, TranscribeLectureArgs, TranscriptionPipeline};
pub use tool::{FfmpegMediaTool, MediaTool, MediaToolError};
pub use transcribe::{SpeechToText, TranscribeError, UpliftSpeechToText};
