use serde::{Deserialize, Serialize};

use sabqcha_core::{LectureId, TaskSetId};

/// One multiple-choice question inside a task set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub question: String,
    pub answer: String,
    pub options: Vec<String>,
}

/// The batch of questions generated for one lecture transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSet {
    pub id: TaskSetId,
    pub lecture_id: LectureId,
    pub tasks: Vec<Task>,
}

impl TaskSet {
    pub fn new(lecture_id: LectureId, tasks: Vec<Task>) -> Self {
        Self {
            id: TaskSetId::new(),
            lecture_id,
            tasks,
        }
    }
}
