pub mod content;
pub mod courses;
pub mod enrollments;
pub mod exercises;
pub mod quizzes;
pub mod student;
pub mod users;

use axum::{Router, extract::State, http::StatusCode, routing::get};

use crate::error::AppError;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(courses::routes())
        .merge(content::routes())
        .merge(exercises::routes())
        .merge(quizzes::routes())
        .merge(student::routes())
        .merge(enrollments::routes())
        .merge(users::routes())
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    sqlx::query("select 1").execute(&state.db).await?;
    Ok(StatusCode::OK)
}
