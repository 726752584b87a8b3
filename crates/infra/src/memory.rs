//! In-memory store implementations for tests/dev.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use sabqcha_core::{LectureId, QuizId, RoomId, SolutionId, TaskSetId};
use sabqcha_lectures::{
    Lecture, LectureStore, Quiz, QuizSolution, QuizStore, StoreError, Task, TaskSet, TaskSetStore,
};

/// In-memory lecture store.
#[derive(Debug, Default)]
pub struct InMemoryLectureStore {
    lectures: Mutex<HashMap<LectureId, Lecture>>,
}

impl InMemoryLectureStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LectureStore for InMemoryLectureStore {
    async fn insert_lecture(&self, lecture: &Lecture) -> Result<(), StoreError> {
        self.lectures
            .lock()
            .unwrap()
            .insert(lecture.id, lecture.clone());
        Ok(())
    }

    async fn get_lecture(&self, id: LectureId) -> Result<Option<Lecture>, StoreError> {
        Ok(self.lectures.lock().unwrap().get(&id).cloned())
    }

    async fn list_for_room(&self, room_id: RoomId) -> Result<Vec<Lecture>, StoreError> {
        let mut lectures: Vec<Lecture> = self
            .lectures
            .lock()
            .unwrap()
            .values()
            .filter(|l| l.room_id == room_id)
            .cloned()
            .collect();
        lectures.sort_by_key(|l| *l.id.as_uuid());
        Ok(lectures)
    }

    async fn add_transcription(&self, id: LectureId, transcript: &str) -> Result<(), StoreError> {
        let mut lectures = self.lectures.lock().unwrap();
        let lecture = lectures.get_mut(&id).ok_or(StoreError::NotFound)?;
        lecture.transcript = Some(transcript.to_string());
        Ok(())
    }
}

/// In-memory task-set store.
#[derive(Debug, Default)]
pub struct InMemoryTaskSetStore {
    task_sets: Mutex<Vec<TaskSet>>,
}

impl InMemoryTaskSetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<TaskSet> {
        self.task_sets.lock().unwrap().clone()
    }
}

#[async_trait]
impl TaskSetStore for InMemoryTaskSetStore {
    async fn insert_task_set(
        &self,
        lecture_id: LectureId,
        tasks: &[Task],
    ) -> Result<TaskSetId, StoreError> {
        let task_set = TaskSet::new(lecture_id, tasks.to_vec());
        let id = task_set.id;
        self.task_sets.lock().unwrap().push(task_set);
        Ok(id)
    }
}

/// In-memory quiz store.
#[derive(Debug, Default)]
pub struct InMemoryQuizStore {
    quizzes: Mutex<HashMap<QuizId, Quiz>>,
    solutions: Mutex<HashMap<SolutionId, QuizSolution>>,
}

impl InMemoryQuizStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_quiz(&self, quiz: Quiz) {
        self.quizzes.lock().unwrap().insert(quiz.id, quiz);
    }

    pub fn insert_solution(&self, solution: QuizSolution) {
        self.solutions
            .lock()
            .unwrap()
            .insert(solution.id, solution);
    }
}

#[async_trait]
impl QuizStore for InMemoryQuizStore {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lecture_roundtrip_and_room_listing() {
        let store = InMemoryLectureStore::new();
        let room_id = RoomId::new();

        let a = Lecture::new(room_id, "rooms/r/a.mp3", "Lecture A").unwrap();
        let b = Lecture::new(room_id, "rooms/r/b.mp3", "Lecture B").unwrap();
        let other = Lecture::new(RoomId::new(), "rooms/x/c.mp3", "Elsewhere").unwrap();
        store.insert_lecture(&a).await.unwrap();
        store.insert_lecture(&b).await.unwrap();
        store.insert_lecture(&other).await.unwrap();

        let listed = store.list_for_room(room_id).await.unwrap();
        assert_eq!(listed.len(), 2);

        store.add_transcription(a.id, "words words").await.unwrap();
        let fetched = store.get_lecture(a.id).await.unwrap().unwrap();
        assert_eq!(fetched.transcript.as_deref(), Some("words words"));
    }

    #[tokio::test]
    async fn transcribing_missing_lecture_errors() {
        let store = InMemoryLectureStore::new();
        let err = store
            .add_transcription(LectureId::new(), "x")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[tokio::test]
    async fn task_sets_accumulate() {
        let store = InMemoryTaskSetStore::new();
        let lecture_id = LectureId::new();
        let tasks = vec![Task {
            question: "q".into(),
            answer: "a".into(),
            options: vec!["a".into(), "b".into()],
        }];

        let id = store.insert_task_set(lecture_id, &tasks).await.unwrap();
        let all = store.all();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, id);
        assert_eq!(all[0].lecture_id, lecture_id);
    }
}
