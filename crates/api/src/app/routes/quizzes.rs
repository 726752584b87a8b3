use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};

use sabqcha_core::{QuizId, SolutionId};
use sabqcha_media::GradeQuizArgs;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new().route("/:quiz_id/solution/:solution_id/grade", post(grade_solution))
}

/// Kick off (or report on) grading for one submitted solution.
pub async fn grade_solution(
    Extension(services): Extension<Arc<AppServices>>,
    Path((quiz_id, solution_id)): Path<(String, String)>,
) -> axum::response::Response {
    let quiz_id: QuizId = match quiz_id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid quiz id"),
    };
    let solution_id: SolutionId = match solution_id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid solution id")
        }
    };

    match services.quizzes.get_quiz(quiz_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return errors::json_error(StatusCode::NOT_FOUND, "not_found", "no such quiz"),
        Err(e) => return errors::store_error_to_response(e),
    }
    match services.quizzes.get_solution(solution_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return errors::json_error(StatusCode::NOT_FOUND, "not_found", "no such solution")
        }
        Err(e) => return errors::store_error_to_response(e),
    }

    let args = GradeQuizArgs {
        quiz_id,
        solution_id,
    };
    let grading = services.grading.clone();
    let in_progress = match services
        .guard
        .schedule(&args, async move { grading.run(args).await })
        .await
    {
        Ok(v) => v,
        Err(e) => return errors::dispatch_error_to_response(e),
    };

    let message = if in_progress {
        "Solution is being graded..."
    } else {
        "Solution graded, please refresh page"
    };
    Json(dto::ScheduleResponse {
        message: message.to_string(),
    })
    .into_response()
}
