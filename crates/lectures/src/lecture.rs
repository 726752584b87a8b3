use serde::{Deserialize, Serialize};

use sabqcha_core::{DomainError, DomainResult, LectureId, QuizId, RoomId, SolutionId};

/// One uploaded lecture recording.
///
/// `file_path` names the source blob in object storage; the transcript is
/// filled in by the background transcription worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lecture {
    pub id: LectureId,
    pub room_id: RoomId,
    pub file_path: String,
    pub title: String,
    pub transcript: Option<String>,
}

impl Lecture {
    /// Create a new, not-yet-transcribed lecture.
    pub fn new(
        room_id: RoomId,
        file_path: impl Into<String>,
        title: impl Into<String>,
    ) -> DomainResult<Self> {
        let file_path = file_path.into();
        let title = title.into();

        if file_path.trim().is_empty() {
            return Err(DomainError::validation("lecture file path must not be empty"));
        }
        if title.trim().is_empty() {
            return Err(DomainError::validation("lecture title must not be empty"));
        }

        Ok(Self {
            id: LectureId::new(),
            room_id,
            file_path,
            title,
            transcript: None,
        })
    }

    pub fn is_transcribed(&self) -> bool {
        self.transcript.is_some()
    }
}

/// A quiz as the grading worker sees it: rubric plus reference solution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
    pub id: QuizId,
    pub rubric_content: String,
    pub answer_sheet_content: String,
}

/// One student's submitted solution for a quiz.
///
/// `solution_path` names the uploaded blob; `score` is filled in by the
/// background grading worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizSolution {
    pub id: SolutionId,
    pub quiz_id: QuizId,
    pub solution_path: String,
    pub score: Option<String>,
}
