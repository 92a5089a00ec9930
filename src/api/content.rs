use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::Router;

use crate::auth::{Action, AuthUser};
use crate::db::{content, courses};
use crate::error::AppError;
use crate::models::{
    Class, Module, NewClassRequest, NewModuleRequest, UpdateClassRequest, UpdateModuleRequest,
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/courses/{course_id}/modules",
            get(list_modules).post(create_module),
        )
        .route("/modules/{id}", put(update_module).delete(delete_module))
        .route("/modules/{id}/classes", post(create_class))
        .route("/classes/{id}", put(update_class).delete(delete_class))
}

/// Content is managed by the owning instructor or a super-admin.
async fn ensure_course_staff(
    state: &AppState,
    user: &AuthUser,
    course_id: &str,
) -> Result<(), AppError> {
    user.authorize(Action::AuthorContent)?;

    let course = courses::find_course_by_id(&state.db, course_id)
        .await?
        .ok_or(AppError::NotFound)?;

    if !user.is_super_admin() && course.profesor_id != user.id {
        return Err(AppError::Forbidden("You do not own this course".to_string()));
    }

    Ok(())
}

async fn list_modules(
    State(state): State<AppState>,
    user: AuthUser,
    Path(course_id): Path<String>,
) -> Result<Json<Vec<Module>>, AppError> {
    ensure_course_staff(&state, &user, &course_id).await?;

    let modules = content::fetch_modules(&state.db, &course_id).await?;
    Ok(Json(modules))
}

async fn create_module(
    State(state): State<AppState>,
    user: AuthUser,
    Path(course_id): Path<String>,
    Json(req): Json<NewModuleRequest>,
) -> Result<(StatusCode, Json<Module>), AppError> {
    ensure_course_staff(&state, &user, &course_id).await?;

    if req.titulo.trim().is_empty() {
        return Err(AppError::BadRequest("titulo is required".to_string()));
    }

    let module = content::insert_module(&state.db, &course_id, req).await?;
    Ok((StatusCode::CREATED, Json(module)))
}

async fn update_module(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateModuleRequest>,
) -> Result<Json<Module>, AppError> {
    let module = content::find_module_by_id(&state.db, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    ensure_course_staff(&state, &user, &module.course_id).await?;

    let updated = content::update_module(&state.db, &id, req)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(updated))
}

async fn delete_module(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let module = content::find_module_by_id(&state.db, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    ensure_course_staff(&state, &user, &module.course_id).await?;

    content::delete_module(&state.db, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn create_class(
    State(state): State<AppState>,
    user: AuthUser,
    Path(module_id): Path<String>,
    Json(req): Json<NewClassRequest>,
) -> Result<(StatusCode, Json<Class>), AppError> {
    let module = content::find_module_by_id(&state.db, &module_id)
        .await?
        .ok_or(AppError::NotFound)?;
    ensure_course_staff(&state, &user, &module.course_id).await?;

    if req.titulo.trim().is_empty() || req.tipo_contenido.trim().is_empty() {
        return Err(AppError::BadRequest(
            "titulo and tipo_contenido are required".to_string(),
        ));
    }

    let class = content::insert_class(&state.db, &module_id, req).await?;
    Ok((StatusCode::CREATED, Json(class)))
}

async fn update_class(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateClassRequest>,
) -> Result<Json<Class>, AppError> {
    let class = content::find_class_by_id(&state.db, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    let module = content::find_module_by_id(&state.db, &class.module_id)
        .await?
        .ok_or(AppError::NotFound)?;
    ensure_course_staff(&state, &user, &module.course_id).await?;

    let updated = content::update_class(&state.db, &id, req)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(updated))
}

async fn delete_class(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let class = content::find_class_by_id(&state.db, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    let module = content::find_module_by_id(&state.db, &class.module_id)
        .await?
        .ok_or(AppError::NotFound)?;
    ensure_course_staff(&state, &user, &module.course_id).await?;

    content::delete_class(&state.db, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
