use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;
use serde_json::json;

use crate::auth::{Action, AuthUser};
use crate::db::{content, courses, enrollments};
use crate::error::AppError;
use crate::models::{
    Course, CourseContent, CourseDraft, CourseEdit, CoursePage, NewCourseRequest, Pagination,
};
use crate::services::{CourseWorkflow, EditOutcome};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/catalog", get(catalog))
        .route("/courses", get(list_courses).post(create_course))
        .route(
            "/courses/{id}",
            get(get_course).put(update_course).delete(delete_course),
        )
        .route("/courses/{id}/content", get(course_content))
        .route("/drafts", get(list_drafts))
        .route("/drafts/{id}/publish", post(publish_draft))
        .route("/drafts/{id}/reject", post(reject_draft))
}

#[derive(Deserialize)]
struct PageParams {
    #[serde(default = "default_page")]
    page: i64,
    #[serde(default = "default_limit")]
    limit: i64,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    10
}

/// Public listing of live courses; no identity required.
async fn catalog(State(state): State<AppState>) -> Result<Json<Vec<Course>>, AppError> {
    let courses = courses::fetch_catalog(&state.db).await?;
    Ok(Json(courses))
}

async fn list_courses(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<PageParams>,
) -> Result<Json<CoursePage>, AppError> {
    user.authorize(Action::ManageCourses)?;

    let page = params.page.max(1);
    let limit = params.limit.clamp(1, 100);

    // Instructors only see their own courses.
    let owner = if user.is_super_admin() {
        None
    } else {
        Some(user.id.as_str())
    };

    let (data, total_items) = courses::fetch_courses_page(&state.db, owner, page, limit).await?;
    let total_pages = (total_items + limit - 1) / limit;

    Ok(Json(CoursePage {
        data,
        pagination: Pagination {
            total_items,
            total_pages,
            current_page: page,
            page_size: limit,
        },
    }))
}

async fn create_course(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<NewCourseRequest>,
) -> Result<(StatusCode, Json<Course>), AppError> {
    user.authorize(Action::ManageCourses)?;

    let workflow = CourseWorkflow::new(state.db.clone());
    let course = workflow.create_course(&user, req).await?;
    Ok((StatusCode::CREATED, Json(course)))
}

async fn get_course(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Course>, AppError> {
    user.authorize(Action::ManageCourses)?;

    let course = courses::find_course_by_id(&state.db, &id)
        .await?
        .ok_or(AppError::NotFound)?;

    if !user.is_super_admin() && course.profesor_id != user.id {
        return Err(AppError::Forbidden("You do not own this course".to_string()));
    }

    Ok(Json(course))
}

async fn update_course(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(edit): Json<CourseEdit>,
) -> Result<Json<serde_json::Value>, AppError> {
    user.authorize(Action::ManageCourses)?;

    let workflow = CourseWorkflow::new(state.db.clone());
    match workflow.edit_course(&user, &id, edit).await? {
        EditOutcome::Updated(course) => Ok(Json(serde_json::to_value(course).map_err(|_| {
            AppError::InternalServerError
        })?)),
        EditOutcome::DraftSaved(draft) => Ok(Json(json!({
            "message": "Changes saved as draft for review.",
            "draft": draft,
        }))),
    }
}

async fn delete_course(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    user.authorize(Action::DeleteCourses)?;

    let deleted = courses::delete_course(&state.db, &id).await?;
    if !deleted {
        return Err(AppError::NotFound);
    }

    Ok(Json(json!({ "message": "Course deleted successfully" })))
}

/// Full module/class tree, for course staff or enrolled students.
async fn course_content(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<CourseContent>, AppError> {
    let course = courses::find_course_by_id(&state.db, &id)
        .await?
        .ok_or(AppError::NotFound)?;

    let is_staff = user.is_super_admin() || course.profesor_id == user.id;
    if !is_staff {
        let enrolled = enrollments::find_enrollment(&state.db, &user.id, &id)
            .await?
            .is_some();
        if !enrolled {
            return Err(AppError::Forbidden(
                "You are not enrolled in this course".to_string(),
            ));
        }
    }

    let tree = content::fetch_course_content(&state.db, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(tree))
}

async fn list_drafts(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<CourseDraft>>, AppError> {
    user.authorize(Action::ReviewDrafts)?;

    let drafts = courses::fetch_pending_drafts(&state.db).await?;
    Ok(Json(drafts))
}

async fn publish_draft(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    user.authorize(Action::ReviewDrafts)?;

    let workflow = CourseWorkflow::new(state.db.clone());
    let course = workflow.publish_draft(&id).await?;
    Ok(Json(json!({
        "message": "Course draft published successfully",
        "course": course,
    })))
}

async fn reject_draft(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    user.authorize(Action::ReviewDrafts)?;

    let workflow = CourseWorkflow::new(state.db.clone());
    workflow.reject_draft(&id).await?;
    Ok(Json(json!({
        "message": "Course draft rejected and deleted successfully",
    })))
}
