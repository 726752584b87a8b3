//! Infrastructure wiring.
//!
//! In-memory stores by default; the `postgres` feature switches every store
//! and the job ledger to the durable implementations. The connection pool is
//! constructed by `main` and handed in — it is never ambient state.

use std::sync::Arc;

use sabqcha_ai::{OpenAiQuestionGenerator, OpenAiSolutionScorer};
use sabqcha_jobs::{DispatchGuard, JobLedger, TokioTaskRunner};
use sabqcha_lectures::{LectureStore, QuizStore, TaskSetStore};
use sabqcha_media::{
    BlobStore, FfmpegMediaTool, GradingWorker, LocalBlobStore, MediaTool, PipelineLimits,
    TranscriptionPipeline, UpliftSpeechToText,
};

use crate::config::ApiConfig;

pub struct AppServices {
    pub lectures: Arc<dyn LectureStore>,
    pub task_sets: Arc<dyn TaskSetStore>,
    pub quizzes: Arc<dyn QuizStore>,
    pub guard: DispatchGuard,
    pub pipeline: Arc<TranscriptionPipeline>,
    pub grading: Arc<GradingWorker>,
}

/// In-memory wiring (dev and tests).
pub fn build_services(config: &ApiConfig) -> AppServices {
    let lectures: Arc<dyn LectureStore> = Arc::new(sabqcha_infra::InMemoryLectureStore::new());
    let task_sets: Arc<dyn TaskSetStore> = Arc::new(sabqcha_infra::InMemoryTaskSetStore::new());
    let quizzes: Arc<dyn QuizStore> = Arc::new(sabqcha_infra::InMemoryQuizStore::new());
    let ledger: Arc<dyn JobLedger> = Arc::new(sabqcha_jobs::InMemoryJobLedger::new());

    build_shared(config, lectures, task_sets, quizzes, ledger)
}

/// Durable wiring over the pool `main` owns.
#[cfg(feature = "postgres")]
pub fn build_postgres_services(config: &ApiConfig, pool: sqlx::PgPool) -> AppServices {
    let lectures: Arc<dyn LectureStore> =
        Arc::new(sabqcha_infra::PostgresLectureStore::new(pool.clone()));
    let task_sets: Arc<dyn TaskSetStore> =
        Arc::new(sabqcha_infra::PostgresTaskSetStore::new(pool.clone()));
    let quizzes: Arc<dyn QuizStore> = Arc::new(sabqcha_infra::PostgresQuizStore::new(pool.clone()));
    let ledger: Arc<dyn JobLedger> = Arc::new(sabqcha_infra::PostgresJobLedger::new(pool));

    build_shared(config, lectures, task_sets, quizzes, ledger)
}

fn build_shared(
    config: &ApiConfig,
    lectures: Arc<dyn LectureStore>,
    task_sets: Arc<dyn TaskSetStore>,
    quizzes: Arc<dyn QuizStore>,
    ledger: Arc<dyn JobLedger>,
) -> AppServices {
    let http = reqwest::Client::new();

    let blobs: Arc<dyn BlobStore> = Arc::new(LocalBlobStore::new(config.blob_root.clone()));
    let media: Arc<dyn MediaTool> = Arc::new(FfmpegMediaTool::default());
    let stt = Arc::new(UpliftSpeechToText::new(
        http.clone(),
        config.uplift_base_url.clone(),
        config.uplift_api_key.clone(),
        config.uplift_model.clone(),
        config.uplift_language.clone(),
    ));
    let generator = Arc::new(OpenAiQuestionGenerator::new(
        http.clone(),
        config.openai_base_url.clone(),
        config.openai_api_key.clone(),
        config.openai_model.clone(),
    ));
    let scorer = Arc::new(OpenAiSolutionScorer::new(
        http,
        config.openai_base_url.clone(),
        config.openai_api_key.clone(),
        config.openai_model.clone(),
    ));

    let limits = PipelineLimits {
        max_concurrent_transcriptions: config.max_concurrent_transcriptions,
        ..PipelineLimits::default()
    };

    let pipeline = Arc::new(TranscriptionPipeline::new(
        blobs.clone(),
        media,
        stt,
        generator,
        lectures.clone(),
        task_sets.clone(),
        limits,
    ));
    let grading = Arc::new(GradingWorker::new(blobs, scorer, quizzes.clone()));
    let guard = DispatchGuard::new(ledger, Arc::new(TokioTaskRunner));

    AppServices {
        lectures,
        task_sets,
        quizzes,
        guard,
        pipeline,
        grading,
    }
}
