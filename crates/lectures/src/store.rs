//! Store traits the background workers persist through.
//!
//! Implementations live in `sabqcha-infra` (Postgres for production,
//! in-memory for tests/dev).

use async_trait::async_trait;

use sabqcha_core::{LectureId, QuizId, RoomId, SolutionId, TaskSetId};

use crate::lecture::{Lecture, Quiz, QuizSolution};
use crate::task::Task;

/// Store error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    #[error("not found")]
    NotFound,
    #[error("storage error: {0}")]
    Storage(String),
}

#[async_trait]
pub trait LectureStore: Send + Sync {
    async fn insert_lecture(&self, lecture: &Lecture) -> Result<(), StoreError>;

    async fn get_lecture(&self, id: LectureId) -> Result<Option<Lecture>, StoreError>;

    async fn list_for_room(&self, room_id: RoomId) -> Result<Vec<Lecture>, StoreError>;

    /// Attach the final transcript to a lecture.
    async fn add_transcription(&self, id: LectureId, transcript: &str) -> Result<(), StoreError>;
}

#[async_trait]
pub trait TaskSetStore: Send + Sync {
    /// Persist a generated batch of questions for a lecture.
    async fn insert_task_set(
        &self,
        lecture_id: LectureId,
        tasks: &[Task],
    ) -> Result<TaskSetId, StoreError>;
}

#[async_trait]
pub trait QuizStore: Send + Sync {
    async fn get_quiz(&self, id: QuizId) -> Result<Option<Quiz>, StoreError>;

    async fn get_solution(&self, id: SolutionId) -> Result<Option<QuizSolution>, StoreError>;

    /// Attach the grader's score text to a solution.
    async fn set_solution_score(&self, id: SolutionId, score: &str) -> Result<(), StoreError>;
}
