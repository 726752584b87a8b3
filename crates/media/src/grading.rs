//! The quiz-grading worker.

use std::path::Path;
use std::sync::Arc;

use sabqcha_ai::{SolutionDocument, SolutionScorer};
use sabqcha_core::{QuizId, SolutionId};
use sabqcha_jobs::{InvalidIdentifier, JobIdentifier, JobKey};
use sabqcha_lectures::QuizStore;
use tracing::info;

use crate::blob::BlobStore;
use crate::error::PipelineError;

/// Typed scheduling arguments for the grading worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradeQuizArgs {
    pub quiz_id: QuizId,
    pub solution_id: SolutionId,
}

impl JobKey for GradeQuizArgs {
    fn job_identifier(&self) -> Result<JobIdentifier, InvalidIdentifier> {
        JobIdentifier::new(format!("{}-{}", self.quiz_id, self.solution_id))
    }
}

/// Download one submitted solution, score it against the quiz rubric and
/// reference answer, persist the grade text.
pub struct GradingWorker {
    blobs: Arc<dyn BlobStore>,
    scorer: Arc<dyn SolutionScorer>,
    quizzes: Arc<dyn QuizStore>,
}

impl GradingWorker {
    pub fn new(
        blobs: Arc<dyn BlobStore>,
        scorer: Arc<dyn SolutionScorer>,
        quizzes: Arc<dyn QuizStore>,
    ) -> Self {
        Self {
            blobs,
            scorer,
            quizzes,
        }
    }

    pub async fn run(&self, args: GradeQuizArgs) -> Result<(), PipelineError> {
        info!(quiz_id = %args.quiz_id, solution_id = %args.solution_id, "grading solution");

        let quiz = self
            .quizzes
            .get_quiz(args.quiz_id)
            .await?
            .ok_or(PipelineError::QuizMissing(args.quiz_id))?;
        let solution = self
            .quizzes
            .get_solution(args.solution_id)
            .await?
            .ok_or(PipelineError::SolutionMissing(args.solution_id))?;

        let scratch = tempfile::tempdir()?;
        let ext = Path::new(&solution.solution_path)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("pdf")
            .to_string();
        let local = scratch.path().join(format!("solution.{ext}"));
        self.blobs.download(&solution.solution_path, &local).await?;

        let bytes = tokio::fs::read(&local).await?;
        let document = SolutionDocument {
            bytes,
            media_type: media_type_for(&ext),
        };

        let score = self
            .scorer
            .score_solution(&quiz.rubric_content, &quiz.answer_sheet_content, &document)
            .await?;

        self.quizzes
            .set_solution_score(args.solution_id, &score)
            .await?;

        info!(solution_id = %args.solution_id, "grade persisted");
        Ok(())
    }
}

fn media_type_for(ext: &str) -> String {
    match ext {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        _ => "application/octet-stream",
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use sabqcha_ai::AiError;
    use sabqcha_lectures::{Quiz, QuizSolution, StoreError};

    use super::*;
    use crate::blob::BlobError;

    struct FakeBlobStore;

    #[async_trait]
    impl BlobStore for FakeBlobStore {
        async fn download(&self, _remote_path: &str, dest: &Path) -> Result<(), BlobError> {
            tokio::fs::write(dest, b"%PDF-1.7 scribbles").await?;
            Ok(())
        }
    }

    struct FakeScorer;

    #[async_trait]
    impl SolutionScorer for FakeScorer {
        async fn score_solution(
            &self,
            rubric: &str,
            answer_sheet: &str,
            solution: &SolutionDocument,
        ) -> Result<String, AiError> {
            assert!(!rubric.is_empty());
            assert!(!answer_sheet.is_empty());
            assert!(!solution.bytes.is_empty());
            Ok("8/10: clean derivation, sign slip in part c".to_string())
        }
    }

    #[derive(Default)]
    struct FakeQuizStore {
        quizzes: Mutex<HashMap<QuizId, Quiz>>,
        solutions: Mutex<HashMap<SolutionId, QuizSolution>>,
    }

    #[async_trait]
    impl QuizStore for FakeQuizStore {
        async fn get_quiz(&self, id: QuizId) -> Result<Option<Quiz>, StoreError> {
            Ok(self.quizzes.lock().unwrap().get(&id).cloned())
        }

        async fn get_solution(&self, id: SolutionId) -> Result<Option<QuizSolution>, StoreError> {
            Ok(self.solutions.lock().unwrap().get(&id).cloned())
        }

        async fn set_solution_score(&self, id: SolutionId, score: &str) -> Result<(), StoreError> {
            let mut solutions = self.solutions.lock().unwrap();
            let solution = solutions.get_mut(&id).ok_or(StoreError::NotFound)?;
            solution.score = Some(score.to_string());
            Ok(())
        }
    }

    #[tokio::test]
    async fn grades_and_persists_score() {
        let quiz_id = QuizId::new();
        let solution_id = SolutionId::new();

        let quizzes = Arc::new(FakeQuizStore::default());
        quizzes.quizzes.lock().unwrap().insert(
            quiz_id,
            Quiz {
                id: quiz_id,
                rubric_content: "full marks for correct derivation".into(),
                answer_sheet_content: "x = 42".into(),
            },
        );
        quizzes.solutions.lock().unwrap().insert(
            solution_id,
            QuizSolution {
                id: solution_id,
                quiz_id,
                solution_path: "solutions/s1.pdf".into(),
                score: None,
            },
        );

        let worker = GradingWorker::new(Arc::new(FakeBlobStore), Arc::new(FakeScorer), quizzes.clone());
        worker
            .run(GradeQuizArgs {
                quiz_id,
                solution_id,
            })
            .await
            .unwrap();

        let stored = quizzes.solutions.lock().unwrap();
        assert!(stored.get(&solution_id).unwrap().score.as_deref().unwrap().starts_with("8/10"));
    }

    #[tokio::test]
    async fn missing_quiz_is_fatal() {
        let worker = GradingWorker::new(
            Arc::new(FakeBlobStore),
            Arc::new(FakeScorer),
            Arc::new(FakeQuizStore::default()),
        );
        let err = worker
            .run(GradeQuizArgs {
                quiz_id: QuizId::new(),
                solution_id: SolutionId::new(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::QuizMissing(_)));
    }

    #[test]
    fn grade_key_is_quiz_dash_solution() {
        let args = GradeQuizArgs {
            quiz_id: QuizId::new(),
            solution_id: SolutionId::new(),
        };
        let identifier = args.job_identifier().unwrap();
        assert_eq!(
            identifier.as_str(),
            format!("{}-{}", args.quiz_id, args.solution_id)
        );
    }
}
