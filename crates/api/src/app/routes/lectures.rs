use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use sabqcha_core::{LectureId, RoomId};
use sabqcha_lectures::Lecture;
use sabqcha_media::TranscribeLectureArgs;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_lecture))
        .route("/room/:room_id", get(list_room_lectures))
        .route("/:lecture_id/transcribe", post(transcribe_lecture))
}

pub async fn create_lecture(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateLectureRequest>,
) -> axum::response::Response {
    let room_id: RoomId = match body.room_id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid room id"),
    };

    let lecture = match Lecture::new(room_id, body.file_path, body.title) {
        Ok(l) => l,
        Err(e) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "validation_error", e.to_string())
        }
    };

    if let Err(e) = services.lectures.insert_lecture(&lecture).await {
        return errors::store_error_to_response(e);
    }

    (
        StatusCode::CREATED,
        Json(serde_json::json!({ "id": lecture.id.to_string() })),
    )
        .into_response()
}

pub async fn list_room_lectures(
    Extension(services): Extension<Arc<AppServices>>,
    Path(room_id): Path<String>,
) -> axum::response::Response {
    let room_id: RoomId = match room_id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid room id"),
    };

    let lectures = match services.lectures.list_for_room(room_id).await {
        Ok(v) => v,
        Err(e) => return errors::store_error_to_response(e),
    };

    Json(dto::ListLecturesResponse {
        room_id: room_id.to_string(),
        lectures: lectures.iter().map(dto::LectureResponse::from).collect(),
    })
    .into_response()
}

/// Kick off (or report on) the transcription pipeline for one lecture.
///
/// The guard makes this idempotent under racing double-clicks: the first
/// caller starts the worker, everyone else gets told a run is in flight or
/// already finished.
pub async fn transcribe_lecture(
    Extension(services): Extension<Arc<AppServices>>,
    Path(lecture_id): Path<String>,
) -> axum::response::Response {
    let lecture_id: LectureId = match lecture_id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid lecture id")
        }
    };

    match services.lectures.get_lecture(lecture_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return errors::json_error(StatusCode::NOT_FOUND, "not_found", "no such lecture")
        }
        Err(e) => return errors::store_error_to_response(e),
    }

    let args = TranscribeLectureArgs { lecture_id };
    let pipeline = services.pipeline.clone();
    let in_progress = match services
        .guard
        .schedule(&args, async move { pipeline.run(lecture_id).await })
        .await
    {
        Ok(v) => v,
        Err(e) => return errors::dispatch_error_to_response(e),
    };

    let message = if in_progress {
        "Tasks are being generated..."
    } else {
        "Tasks generated, please refresh page"
    };
    Json(dto::ScheduleResponse {
        message: message.to_string(),
    })
    .into_response()
}
