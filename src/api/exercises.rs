use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;

use crate::auth::{Action, AuthUser};
use crate::db::exercises;
use crate::error::AppError;
use crate::models::{Exercise, ExerciseRequest};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/exercises", get(list_exercises).post(create_exercise))
        .route(
            "/exercises/{id}",
            get(get_exercise)
                .put(update_exercise)
                .delete(delete_exercise),
        )
}

async fn list_exercises(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<Exercise>>, AppError> {
    user.authorize(Action::AuthorContent)?;

    let exercises = exercises::fetch_exercises(&state.db).await?;
    Ok(Json(exercises))
}

async fn create_exercise(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<ExerciseRequest>,
) -> Result<(StatusCode, Json<Exercise>), AppError> {
    user.authorize(Action::AuthorContent)?;

    if req.instrucciones.trim().is_empty() {
        return Err(AppError::BadRequest("Instructions are required".to_string()));
    }

    let exercise = exercises::insert_exercise(&state.db, &req.instrucciones).await?;
    Ok((StatusCode::CREATED, Json(exercise)))
}

async fn get_exercise(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Exercise>, AppError> {
    user.authorize(Action::AuthorContent)?;

    let exercise = exercises::find_exercise_by_id(&state.db, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(exercise))
}

async fn update_exercise(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<ExerciseRequest>,
) -> Result<Json<Exercise>, AppError> {
    user.authorize(Action::AuthorContent)?;

    if req.instrucciones.trim().is_empty() {
        return Err(AppError::BadRequest("Instructions are required".to_string()));
    }

    let updated = exercises::update_exercise(&state.db, &id, &req.instrucciones).await?;
    if !updated {
        return Err(AppError::NotFound);
    }

    let exercise = exercises::find_exercise_by_id(&state.db, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(exercise))
}

/// Refuses to delete an exercise that any class still points at.
async fn delete_exercise(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    user.authorize(Action::AuthorContent)?;

    if exercises::find_exercise_by_id(&state.db, &id).await?.is_none() {
        return Err(AppError::NotFound);
    }

    if exercises::exercise_in_use(&state.db, &id).await? {
        return Err(AppError::BadRequest(
            "Cannot delete exercise. It is currently used in at least one class.".to_string(),
        ));
    }

    exercises::delete_exercise(&state.db, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
