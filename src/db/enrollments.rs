use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::{
    Course, Enrollment, EnrollmentRequest, EnrollmentRequestRow, RequestStatus,
};

pub async fn find_enrollment(
    db: &SqlitePool,
    user_id: &str,
    course_id: &str,
) -> Result<Option<Enrollment>, sqlx::Error> {
    sqlx::query_as::<_, Enrollment>(
        "SELECT id, user_id, course_id, created_at FROM enrollments \
         WHERE user_id = ? AND course_id = ?",
    )
    .bind(user_id)
    .bind(course_id)
    .fetch_optional(db)
    .await
}

pub async fn find_request(
    db: &SqlitePool,
    user_id: &str,
    course_id: &str,
) -> Result<Option<EnrollmentRequest>, sqlx::Error> {
    sqlx::query_as::<_, EnrollmentRequest>(
        "SELECT id, user_id, course_id, status, created_at FROM enrollment_requests \
         WHERE user_id = ? AND course_id = ?",
    )
    .bind(user_id)
    .bind(course_id)
    .fetch_optional(db)
    .await
}

pub async fn find_request_by_id(
    db: &SqlitePool,
    id: &str,
) -> Result<Option<EnrollmentRequest>, sqlx::Error> {
    sqlx::query_as::<_, EnrollmentRequest>(
        "SELECT id, user_id, course_id, status, created_at FROM enrollment_requests \
         WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn insert_request(
    db: &SqlitePool,
    user_id: &str,
    course_id: &str,
) -> Result<EnrollmentRequest, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();

    sqlx::query(
        "INSERT INTO enrollment_requests (id, user_id, course_id, status, created_at) \
         VALUES (?, ?, ?, 'PENDING', ?)",
    )
    .bind(&id)
    .bind(user_id)
    .bind(course_id)
    .bind(&now)
    .execute(db)
    .await?;

    Ok(EnrollmentRequest {
        id,
        user_id: user_id.to_string(),
        course_id: course_id.to_string(),
        status: RequestStatus::Pending,
        created_at: now,
    })
}

/// Admin listing with requester name/email and course title joined on,
/// newest first, optionally filtered by status.
pub async fn fetch_requests(
    db: &SqlitePool,
    status: Option<RequestStatus>,
) -> Result<Vec<EnrollmentRequestRow>, sqlx::Error> {
    const BASE: &str = "SELECT r.id, r.user_id, r.course_id, r.status, r.created_at, \
         u.nombre_completo AS user_nombre, u.email AS user_email, c.titulo AS course_titulo \
         FROM enrollment_requests r \
         LEFT JOIN users u ON u.id = r.user_id \
         LEFT JOIN courses c ON c.id = r.course_id";

    match status {
        Some(status) => {
            let sql = format!("{BASE} WHERE r.status = ? ORDER BY r.created_at DESC");
            sqlx::query_as::<_, EnrollmentRequestRow>(&sql)
                .bind(status)
                .fetch_all(db)
                .await
        }
        None => {
            let sql = format!("{BASE} ORDER BY r.created_at DESC");
            sqlx::query_as::<_, EnrollmentRequestRow>(&sql).fetch_all(db).await
        }
    }
}

/// Courses the user holds an enrollment for, ordered by title.
pub async fn fetch_enrolled_courses(
    db: &SqlitePool,
    user_id: &str,
) -> Result<Vec<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(
        "SELECT c.id, c.titulo, c.slug, c.descripcion_corta, c.descripcion_larga, \
         c.imagen_portada, c.video_presentacion, c.modalidad, c.nivel, c.publico_objetivo, \
         c.precio, c.activo, c.profesor_id, c.created_at, c.updated_at \
         FROM enrollments e JOIN courses c ON c.id = e.course_id \
         WHERE e.user_id = ? ORDER BY c.titulo ASC",
    )
    .bind(user_id)
    .fetch_all(db)
    .await
}
