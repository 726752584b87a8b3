use axum::Router;

pub mod lectures;
pub mod quizzes;
pub mod system;

/// Router for all domain endpoints.
pub fn router() -> Router {
    Router::new()
        .nest("/lecture", lectures::router())
        .nest("/quiz", quizzes::router())
}
