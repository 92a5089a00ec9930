use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;

use crate::auth::{Action, AuthUser};
use crate::db::users;
use crate::error::AppError;
use crate::models::{NewUserRequest, User};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/users", get(list_users).post(create_user))
}

async fn list_users(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<User>>, AppError> {
    user.authorize(Action::ManageUsers)?;

    let users = users::fetch_users(&state.db).await?;
    Ok(Json(users))
}

async fn create_user(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<NewUserRequest>,
) -> Result<(StatusCode, Json<User>), AppError> {
    user.authorize(Action::ManageUsers)?;

    if req.email.trim().is_empty() || req.nombre_completo.trim().is_empty() {
        return Err(AppError::BadRequest(
            "email and nombre_completo are required".to_string(),
        ));
    }

    let created = users::insert_user(&state.db, req)
        .await
        .map_err(|e| AppError::conflict_on_unique(e, "A user with this email already exists"))?;
    Ok((StatusCode::CREATED, Json(created)))
}
