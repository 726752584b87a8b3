//! The chunked transcription worker.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use sabqcha_ai::QuestionGenerator;
use sabqcha_core::LectureId;
use sabqcha_jobs::{InvalidIdentifier, JobIdentifier, JobKey};
use sabqcha_lectures::{LectureStore, Task, TaskSetStore};
use tokio::sync::Semaphore;
use tracing::{info, warn};

use crate::blob::BlobStore;
use crate::chunk::{aggregate_transcripts, plan_chunks, ChunkWindow};
use crate::error::PipelineError;
use crate::tool::MediaTool;
use crate::transcribe::SpeechToText;

/// Typed scheduling arguments for the transcription worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranscribeLectureArgs {
    pub lecture_id: LectureId,
}

impl JobKey for TranscribeLectureArgs {
    fn job_identifier(&self) -> Result<JobIdentifier, InvalidIdentifier> {
        JobIdentifier::new(format!("lecture-{}", self.lecture_id))
    }
}

/// Concurrency and sizing knobs.
///
/// Fan-out to the external transcription service is capped so a long
/// recording cannot blow through its rate limits; ffmpeg child processes
/// are capped separately.
#[derive(Debug, Clone)]
pub struct PipelineLimits {
    pub chunk_len_secs: u64,
    pub max_duration_secs: u64,
    pub max_concurrent_transcriptions: usize,
    pub max_concurrent_extractions: usize,
}

impl Default for PipelineLimits {
    fn default() -> Self {
        Self {
            chunk_len_secs: crate::chunk::CHUNK_LEN_SECS,
            max_duration_secs: crate::chunk::MAX_AUDIO_DURATION_SECS,
            max_concurrent_transcriptions: 4,
            max_concurrent_extractions: 4,
        }
    }
}

/// One planned clip on disk, waiting for (or holding) its transcript.
#[derive(Debug, Clone)]
struct TranscriptChunk {
    sequence_index: usize,
    clip_path: PathBuf,
}

/// Download → probe → chunk → transcribe (parallel) → aggregate → generate
/// → persist. Terminal on any path; every failure aborts the whole run.
pub struct TranscriptionPipeline {
    blobs: Arc<dyn BlobStore>,
    media: Arc<dyn MediaTool>,
    stt: Arc<dyn SpeechToText>,
    generator: Arc<dyn QuestionGenerator>,
    lectures: Arc<dyn LectureStore>,
    task_sets: Arc<dyn TaskSetStore>,
    limits: PipelineLimits,
}

impl TranscriptionPipeline {
    pub fn new(
        blobs: Arc<dyn BlobStore>,
        media: Arc<dyn MediaTool>,
        stt: Arc<dyn SpeechToText>,
        generator: Arc<dyn QuestionGenerator>,
        lectures: Arc<dyn LectureStore>,
        task_sets: Arc<dyn TaskSetStore>,
        limits: PipelineLimits,
    ) -> Self {
        Self {
            blobs,
            media,
            stt,
            generator,
            lectures,
            task_sets,
            limits,
        }
    }

    /// Run the whole pipeline for one lecture.
    ///
    /// All scratch files live in a per-run temp directory that is removed
    /// when this function returns, success or failure.
    pub async fn run(&self, lecture_id: LectureId) -> Result<(), PipelineError> {
        let lecture = self
            .lectures
            .get_lecture(lecture_id)
            .await?
            .ok_or(PipelineError::LectureMissing(lecture_id))?;

        let scratch = tempfile::tempdir()?;
        let ext = extension_of(&lecture.file_path, "mp3");
        let source_path = scratch.path().join(format!("source.{ext}"));

        self.blobs.download(&lecture.file_path, &source_path).await?;

        let duration_secs = self.media.probe_duration_secs(&source_path).await?;
        if duration_secs > self.limits.max_duration_secs {
            warn!(
                duration_secs,
                ceiling_secs = self.limits.max_duration_secs,
                "audio exceeds duration ceiling"
            );
        }

        let windows = plan_chunks(duration_secs, self.limits.chunk_len_secs);
        info!(duration_secs, chunks = windows.len(), "planned transcription chunks");

        let chunks = self
            .extract_all(&source_path, scratch.path(), &ext, &windows)
            .await?;
        let transcript = self.transcribe_all(&chunks).await?;

        self.lectures
            .add_transcription(lecture_id, &transcript)
            .await?;

        info!(chars = transcript.len(), "generating task set from transcript");
        let mcqs = self.generator.generate_mcqs(&transcript).await?;
        let tasks: Vec<Task> = mcqs
            .into_iter()
            .map(|m| Task {
                question: m.question,
                answer: m.answer,
                options: m.options,
            })
            .collect();

        let task_set_id = self.task_sets.insert_task_set(lecture_id, &tasks).await?;
        info!(%task_set_id, tasks = tasks.len(), "transcription pipeline finished");
        Ok(())
    }

    /// Cut every planned window into its own clip, concurrently.
    ///
    /// All-or-nothing: the first failed extraction fails the run.
    async fn extract_all(
        &self,
        source: &Path,
        scratch_dir: &Path,
        ext: &str,
        windows: &[ChunkWindow],
    ) -> Result<Vec<TranscriptChunk>, PipelineError> {
        let permits = Arc::new(Semaphore::new(self.limits.max_concurrent_extractions));

        let extractions = windows.iter().map(|window| {
            let clip_path = scratch_dir.join(format!("chunk-{:04}.{ext}", window.sequence_index));
            let media = Arc::clone(&self.media);
            let permits = Arc::clone(&permits);
            let chunk_len = self.limits.chunk_len_secs;
            let window = window.clone();
            let source = source.to_path_buf();

            async move {
                // Never closed; acquire only fails on a closed semaphore.
                let _permit = permits.acquire().await.expect("semaphore closed");
                media
                    .extract_clip(&source, window.start_offset_secs, chunk_len, &clip_path)
                    .await?;
                Ok::<_, PipelineError>(TranscriptChunk {
                    sequence_index: window.sequence_index,
                    clip_path,
                })
            }
        });

        futures::future::try_join_all(extractions).await
    }

    /// Transcribe every clip concurrently and reassemble in timeline order.
    ///
    /// Completion order is unconstrained; ordering is recovered at the
    /// aggregation step, not at the call-completion step. The first failed
    /// chunk fails the barrier and aggregation is skipped.
    async fn transcribe_all(&self, chunks: &[TranscriptChunk]) -> Result<String, PipelineError> {
        let permits = Arc::new(Semaphore::new(self.limits.max_concurrent_transcriptions));

        let calls = chunks.iter().map(|chunk| {
            let stt = Arc::clone(&self.stt);
            let permits = Arc::clone(&permits);
            let chunk = chunk.clone();

            async move {
                let _permit = permits.acquire().await.expect("semaphore closed");
                let text = stt.transcribe_clip(&chunk.clip_path).await?;
                Ok::<_, PipelineError>((chunk.sequence_index, text))
            }
        });

        let parts = futures::future::try_join_all(calls).await?;
        Ok(aggregate_transcripts(parts))
    }
}

fn extension_of(path: &str, default: &str) -> String {
    Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or(default)
        .to_string()
}
