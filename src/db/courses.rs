use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::{Course, CourseDraft, NewCourseRequest};

const COURSE_COLUMNS: &str = "id, titulo, slug, descripcion_corta, descripcion_larga, \
     imagen_portada, video_presentacion, modalidad, nivel, publico_objetivo, precio, \
     activo, profesor_id, created_at, updated_at";

const DRAFT_COLUMNS: &str = "id, course_id, profesor_id, titulo, slug, descripcion_corta, \
     descripcion_larga, imagen_portada, video_presentacion, modalidad, nivel, \
     publico_objetivo, precio, is_pending_review, updated_at";

pub async fn insert_course(
    db: &SqlitePool,
    req: NewCourseRequest,
    activo: bool,
) -> Result<Course, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();

    sqlx::query(
        "INSERT INTO courses (id, titulo, slug, descripcion_corta, descripcion_larga, \
         imagen_portada, video_presentacion, modalidad, nivel, publico_objetivo, precio, \
         activo, profesor_id, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(&req.titulo)
    .bind(&req.slug)
    .bind(&req.descripcion_corta)
    .bind(&req.descripcion_larga)
    .bind(&req.imagen_portada)
    .bind(&req.video_presentacion)
    .bind(&req.modalidad)
    .bind(&req.nivel)
    .bind(&req.publico_objetivo)
    .bind(req.precio)
    .bind(activo)
    .bind(&req.profesor_id)
    .bind(&now)
    .bind(&now)
    .execute(db)
    .await?;

    Ok(Course {
        id,
        titulo: req.titulo,
        slug: req.slug,
        descripcion_corta: req.descripcion_corta,
        descripcion_larga: req.descripcion_larga,
        imagen_portada: req.imagen_portada,
        video_presentacion: req.video_presentacion,
        modalidad: req.modalidad,
        nivel: req.nivel,
        publico_objetivo: req.publico_objetivo,
        precio: req.precio,
        activo,
        profesor_id: req.profesor_id,
        created_at: now.clone(),
        updated_at: now,
    })
}

pub async fn find_course_by_id(db: &SqlitePool, id: &str) -> Result<Option<Course>, sqlx::Error> {
    let sql = format!("SELECT {COURSE_COLUMNS} FROM courses WHERE id = ?");
    sqlx::query_as::<_, Course>(&sql).bind(id).fetch_optional(db).await
}

/// Admin listing, newest first. `owner` restricts to one instructor's
/// courses; pages are 1-based.
pub async fn fetch_courses_page(
    db: &SqlitePool,
    owner: Option<&str>,
    page: i64,
    limit: i64,
) -> Result<(Vec<Course>, i64), sqlx::Error> {
    let offset = (page - 1) * limit;

    let (courses, total) = match owner {
        Some(profesor_id) => {
            let sql = format!(
                "SELECT {COURSE_COLUMNS} FROM courses WHERE profesor_id = ? \
                 ORDER BY created_at DESC LIMIT ? OFFSET ?"
            );
            let courses = sqlx::query_as::<_, Course>(&sql)
                .bind(profesor_id)
                .bind(limit)
                .bind(offset)
                .fetch_all(db)
                .await?;
            let total =
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM courses WHERE profesor_id = ?")
                    .bind(profesor_id)
                    .fetch_one(db)
                    .await?;
            (courses, total)
        }
        None => {
            let sql = format!(
                "SELECT {COURSE_COLUMNS} FROM courses ORDER BY created_at DESC LIMIT ? OFFSET ?"
            );
            let courses = sqlx::query_as::<_, Course>(&sql)
                .bind(limit)
                .bind(offset)
                .fetch_all(db)
                .await?;
            let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM courses")
                .fetch_one(db)
                .await?;
            (courses, total)
        }
    };

    Ok((courses, total))
}

/// Public catalog: live courses only.
pub async fn fetch_catalog(db: &SqlitePool) -> Result<Vec<Course>, sqlx::Error> {
    let sql = format!("SELECT {COURSE_COLUMNS} FROM courses WHERE activo = 1 ORDER BY titulo ASC");
    sqlx::query_as::<_, Course>(&sql).fetch_all(db).await
}

/// Writes the full course row back. Callers patch the struct first.
/// Takes an executor so it can run inside a transaction.
pub async fn update_course(
    db: impl sqlx::SqliteExecutor<'_>,
    course: &Course,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE courses SET titulo = ?, slug = ?, descripcion_corta = ?, descripcion_larga = ?, \
         imagen_portada = ?, video_presentacion = ?, modalidad = ?, nivel = ?, \
         publico_objetivo = ?, precio = ?, activo = ?, profesor_id = ?, updated_at = ? \
         WHERE id = ?",
    )
    .bind(&course.titulo)
    .bind(&course.slug)
    .bind(&course.descripcion_corta)
    .bind(&course.descripcion_larga)
    .bind(&course.imagen_portada)
    .bind(&course.video_presentacion)
    .bind(&course.modalidad)
    .bind(&course.nivel)
    .bind(&course.publico_objetivo)
    .bind(course.precio)
    .bind(course.activo)
    .bind(&course.profesor_id)
    .bind(&course.updated_at)
    .bind(&course.id)
    .execute(db)
    .await?;

    Ok(())
}

pub async fn delete_course(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM courses WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}

pub async fn find_draft_by_id(
    db: &SqlitePool,
    id: &str,
) -> Result<Option<CourseDraft>, sqlx::Error> {
    let sql = format!("SELECT {DRAFT_COLUMNS} FROM course_drafts WHERE id = ?");
    sqlx::query_as::<_, CourseDraft>(&sql).bind(id).fetch_optional(db).await
}

pub async fn find_draft_for_course(
    db: &SqlitePool,
    course_id: &str,
) -> Result<Option<CourseDraft>, sqlx::Error> {
    let sql = format!("SELECT {DRAFT_COLUMNS} FROM course_drafts WHERE course_id = ?");
    sqlx::query_as::<_, CourseDraft>(&sql)
        .bind(course_id)
        .fetch_optional(db)
        .await
}

pub async fn fetch_pending_drafts(db: &SqlitePool) -> Result<Vec<CourseDraft>, sqlx::Error> {
    let sql = format!(
        "SELECT {DRAFT_COLUMNS} FROM course_drafts WHERE is_pending_review = 1 \
         ORDER BY updated_at DESC"
    );
    sqlx::query_as::<_, CourseDraft>(&sql).fetch_all(db).await
}

/// One draft per course: a second save replaces the existing row wholesale.
pub async fn upsert_draft(db: &SqlitePool, draft: &CourseDraft) -> Result<CourseDraft, sqlx::Error> {
    match find_draft_for_course(db, &draft.course_id).await? {
        Some(existing) => {
            sqlx::query(
                "UPDATE course_drafts SET profesor_id = ?, titulo = ?, slug = ?, \
                 descripcion_corta = ?, descripcion_larga = ?, imagen_portada = ?, \
                 video_presentacion = ?, modalidad = ?, nivel = ?, publico_objetivo = ?, \
                 precio = ?, is_pending_review = ?, updated_at = ? WHERE course_id = ?",
            )
            .bind(&draft.profesor_id)
            .bind(&draft.titulo)
            .bind(&draft.slug)
            .bind(&draft.descripcion_corta)
            .bind(&draft.descripcion_larga)
            .bind(&draft.imagen_portada)
            .bind(&draft.video_presentacion)
            .bind(&draft.modalidad)
            .bind(&draft.nivel)
            .bind(&draft.publico_objetivo)
            .bind(draft.precio)
            .bind(draft.is_pending_review)
            .bind(&draft.updated_at)
            .bind(&draft.course_id)
            .execute(db)
            .await?;

            Ok(CourseDraft {
                id: existing.id,
                ..draft.clone()
            })
        }
        None => {
            sqlx::query(
                "INSERT INTO course_drafts (id, course_id, profesor_id, titulo, slug, \
                 descripcion_corta, descripcion_larga, imagen_portada, video_presentacion, \
                 modalidad, nivel, publico_objetivo, precio, is_pending_review, updated_at) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(&draft.id)
            .bind(&draft.course_id)
            .bind(&draft.profesor_id)
            .bind(&draft.titulo)
            .bind(&draft.slug)
            .bind(&draft.descripcion_corta)
            .bind(&draft.descripcion_larga)
            .bind(&draft.imagen_portada)
            .bind(&draft.video_presentacion)
            .bind(&draft.modalidad)
            .bind(&draft.nivel)
            .bind(&draft.publico_objetivo)
            .bind(draft.precio)
            .bind(draft.is_pending_review)
            .bind(&draft.updated_at)
            .execute(db)
            .await?;

            Ok(draft.clone())
        }
    }
}

pub async fn delete_draft(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM course_drafts WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}

pub async fn delete_draft_for_course(
    db: impl sqlx::SqliteExecutor<'_>,
    course_id: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM course_drafts WHERE course_id = ?")
        .bind(course_id)
        .execute(db)
        .await?;

    Ok(())
}
