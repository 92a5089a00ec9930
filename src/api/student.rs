use axum::Json;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::Router;

use crate::auth::{Action, AuthUser};
use crate::db::{enrollments, quizzes};
use crate::error::AppError;
use crate::models::{Course, QuizResult, QuizSubmission, StudentQuiz};
use crate::services::grading;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/student/courses", get(my_courses))
        .route("/student/quizzes/{id}", get(get_quiz))
        .route("/student/quizzes/{id}/submit", post(submit_quiz))
}

async fn my_courses(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<Course>>, AppError> {
    user.authorize(Action::Study)?;

    let courses = enrollments::fetch_enrolled_courses(&state.db, &user.id).await?;
    Ok(Json(courses))
}

/// A quiz is reachable only through a class attachment, and only by
/// students enrolled in that course. Instructors and super-admins pass
/// regardless, which keeps authoring previews simple.
async fn ensure_quiz_access(
    state: &AppState,
    user: &AuthUser,
    quiz_id: &str,
) -> Result<(), AppError> {
    let course_id = quizzes::find_course_for_quiz(&state.db, quiz_id)
        .await?
        .ok_or(AppError::NotFound)?;

    if user.is_instructor() || user.is_super_admin() {
        return Ok(());
    }

    let enrolled = enrollments::find_enrollment(&state.db, &user.id, &course_id)
        .await?
        .is_some();
    if !enrolled {
        return Err(AppError::Forbidden(
            "You are not enrolled in the course for this quiz".to_string(),
        ));
    }

    Ok(())
}

/// Pre-submission view: option correctness is stripped server-side.
async fn get_quiz(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<StudentQuiz>, AppError> {
    ensure_quiz_access(&state, &user, &id).await?;

    let quiz = quizzes::fetch_student_quiz(&state.db, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(quiz))
}

async fn submit_quiz(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(submission): Json<QuizSubmission>,
) -> Result<Json<QuizResult>, AppError> {
    ensure_quiz_access(&state, &user, &id).await?;

    let correct_sets = quizzes::fetch_correct_option_sets(&state.db, &id).await?;
    let result = grading::grade(&correct_sets, &submission.answers);
    Ok(Json(result))
}
