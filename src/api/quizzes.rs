use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::Router;

use crate::auth::{Action, AuthUser};
use crate::db::quizzes;
use crate::error::AppError;
use crate::models::{
    NewOptionRequest, NewQuestionRequest, NewQuizRequest, Question, Quiz, QuizDetail,
    QuizOption, UpdateOptionRequest, UpdateQuestionRequest, UpdateQuizRequest,
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/quizzes", get(list_quizzes).post(create_quiz))
        .route(
            "/quizzes/{id}",
            get(get_quiz).put(update_quiz).delete(delete_quiz),
        )
        .route("/quizzes/{id}/questions", post(create_question))
        .route(
            "/questions/{id}",
            put(update_question).delete(delete_question),
        )
        .route("/questions/{id}/options", post(create_option))
        .route("/options/{id}", put(update_option).delete(delete_option))
}

async fn list_quizzes(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<Quiz>>, AppError> {
    user.authorize(Action::AuthorContent)?;

    let quizzes = quizzes::fetch_quizzes(&state.db).await?;
    Ok(Json(quizzes))
}

async fn create_quiz(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<NewQuizRequest>,
) -> Result<(StatusCode, Json<Quiz>), AppError> {
    user.authorize(Action::AuthorContent)?;

    if req.titulo.trim().is_empty() {
        return Err(AppError::BadRequest("Title is required".to_string()));
    }

    let quiz = quizzes::insert_quiz(&state.db, &req.titulo).await?;
    Ok((StatusCode::CREATED, Json(quiz)))
}

/// Authoring view: includes `es_correcta`. Students never hit this
/// route; they go through /student/quizzes/{id}.
async fn get_quiz(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<QuizDetail>, AppError> {
    user.authorize(Action::AuthorContent)?;

    let detail = quizzes::fetch_quiz_detail(&state.db, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(detail))
}

async fn update_quiz(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateQuizRequest>,
) -> Result<Json<Quiz>, AppError> {
    user.authorize(Action::AuthorContent)?;

    if req.titulo.trim().is_empty() {
        return Err(AppError::BadRequest("Title is required".to_string()));
    }

    let updated = quizzes::update_quiz(&state.db, &id, &req.titulo).await?;
    if !updated {
        return Err(AppError::NotFound);
    }

    let quiz = quizzes::find_quiz_by_id(&state.db, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(quiz))
}

async fn delete_quiz(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    user.authorize(Action::AuthorContent)?;

    let deleted = quizzes::delete_quiz(&state.db, &id).await?;
    if !deleted {
        return Err(AppError::NotFound);
    }

    Ok(StatusCode::NO_CONTENT)
}

async fn create_question(
    State(state): State<AppState>,
    user: AuthUser,
    Path(quiz_id): Path<String>,
    Json(req): Json<NewQuestionRequest>,
) -> Result<(StatusCode, Json<Question>), AppError> {
    user.authorize(Action::AuthorContent)?;

    if req.texto.trim().is_empty() {
        return Err(AppError::BadRequest("Question text is required".to_string()));
    }

    if quizzes::find_quiz_by_id(&state.db, &quiz_id).await?.is_none() {
        return Err(AppError::NotFound);
    }

    let question = quizzes::insert_question(&state.db, &quiz_id, req).await?;
    Ok((StatusCode::CREATED, Json(question)))
}

async fn update_question(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateQuestionRequest>,
) -> Result<Json<Question>, AppError> {
    user.authorize(Action::AuthorContent)?;

    let question = quizzes::update_question(&state.db, &id, req)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(question))
}

async fn delete_question(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    user.authorize(Action::AuthorContent)?;

    let deleted = quizzes::delete_question(&state.db, &id).await?;
    if !deleted {
        return Err(AppError::NotFound);
    }

    Ok(StatusCode::NO_CONTENT)
}

async fn create_option(
    State(state): State<AppState>,
    user: AuthUser,
    Path(question_id): Path<String>,
    Json(req): Json<NewOptionRequest>,
) -> Result<(StatusCode, Json<QuizOption>), AppError> {
    user.authorize(Action::AuthorContent)?;

    if req.texto.trim().is_empty() {
        return Err(AppError::BadRequest("Option text is required".to_string()));
    }

    if quizzes::find_question_by_id(&state.db, &question_id).await?.is_none() {
        return Err(AppError::NotFound);
    }

    let option = quizzes::insert_option(&state.db, &question_id, req).await?;
    Ok((StatusCode::CREATED, Json(option)))
}

async fn update_option(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateOptionRequest>,
) -> Result<Json<QuizOption>, AppError> {
    user.authorize(Action::AuthorContent)?;

    let option = quizzes::update_option(&state.db, &id, req)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(option))
}

async fn delete_option(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    user.authorize(Action::AuthorContent)?;

    let deleted = quizzes::delete_option(&state.db, &id).await?;
    if !deleted {
        return Err(AppError::NotFound);
    }

    Ok(StatusCode::NO_CONTENT)
}
