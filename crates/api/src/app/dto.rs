//! Request/response DTOs and JSON mapping.

use serde::{Deserialize, Serialize};

use sabqcha_lectures::Lecture;

#[derive(Debug, Deserialize)]
pub struct CreateLectureRequest {
    pub room_id: String,
    pub file_path: String,
    pub title: String,
}

#[derive(Debug, Serialize)]
pub struct LectureResponse {
    pub id: String,
    pub room_id: String,
    pub title: String,
    pub transcribed: bool,
}

impl From<&Lecture> for LectureResponse {
    fn from(lecture: &Lecture) -> Self {
        Self {
            id: lecture.id.to_string(),
            room_id: lecture.room_id.to_string(),
            title: lecture.title.clone(),
            transcribed: lecture.is_transcribed(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListLecturesResponse {
    pub room_id: String,
    pub lectures: Vec<LectureResponse>,
}

#[derive(Debug, Serialize)]
pub struct ScheduleResponse {
    pub message: String,
}
