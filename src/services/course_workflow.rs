use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::db::courses;
use crate::error::AppError;
use crate::models::{Course, CourseDraft, CourseEdit, NewCourseRequest};

/// Outcome of a course edit: either the live row was updated, or the
/// change was staged as a draft pending review.
#[derive(Debug)]
pub enum EditOutcome {
    Updated(Course),
    DraftSaved(CourseDraft),
}

/// Decouples instructor edits from the publicly visible course record.
/// Edits to a live course by its owner are staged in a draft; a
/// super-admin edit always lands directly and discards any draft.
pub struct CourseWorkflow {
    db: SqlitePool,
}

impl CourseWorkflow {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Instructors can only create courses for themselves, and those
    /// start unpublished. A super-admin course defaults to live.
    pub async fn create_course(
        &self,
        actor: &AuthUser,
        req: NewCourseRequest,
    ) -> Result<Course, AppError> {
        if req.titulo.trim().is_empty() || req.slug.trim().is_empty() {
            return Err(AppError::BadRequest(
                "titulo and slug are required".to_string(),
            ));
        }

        let activo = if actor.is_super_admin() {
            req.activo.unwrap_or(true)
        } else {
            if req.profesor_id != actor.id {
                return Err(AppError::Forbidden(
                    "Instructors can only create courses for themselves".to_string(),
                ));
            }
            false
        };

        courses::insert_course(&self.db, req, activo)
            .await
            .map_err(|e| AppError::conflict_on_unique(e, "A course with this slug already exists"))
    }

    pub async fn edit_course(
        &self,
        actor: &AuthUser,
        course_id: &str,
        mut edit: CourseEdit,
    ) -> Result<EditOutcome, AppError> {
        let course = courses::find_course_by_id(&self.db, course_id)
            .await?
            .ok_or(AppError::NotFound)?;

        if actor.is_super_admin() {
            // Admin change wins over whatever an instructor had staged;
            // the update and the draft discard commit together so a
            // stale draft can never outlive the admin edit.
            let updated = patch_course(course, edit);
            let mut tx = self.db.begin().await?;
            courses::update_course(&mut *tx, &updated).await?;
            courses::delete_draft_for_course(&mut *tx, course_id).await?;
            tx.commit().await?;
            return Ok(EditOutcome::Updated(updated));
        }

        if course.profesor_id != actor.id {
            return Err(AppError::Forbidden(
                "You do not own this course".to_string(),
            ));
        }

        // Instructors cannot flip visibility.
        edit.activo = None;

        if course.activo {
            let draft = draft_from_edit(&course, &actor.id, &edit);
            let saved = courses::upsert_draft(&self.db, &draft).await?;
            info!("course edit staged as draft: course={}", course_id);
            Ok(EditOutcome::DraftSaved(saved))
        } else {
            let updated = self.apply_direct(course, edit).await?;
            Ok(EditOutcome::Updated(updated))
        }
    }

    async fn apply_direct(&self, course: Course, edit: CourseEdit) -> Result<Course, AppError> {
        let course = patch_course(course, edit);
        courses::update_course(&self.db, &course).await?;
        Ok(course)
    }

    /// Copies every mirrored field from the draft onto the course,
    /// forces it live and deletes the draft, all in one transaction.
    /// A replace, not a merge.
    pub async fn publish_draft(&self, draft_id: &str) -> Result<Course, AppError> {
        let draft = courses::find_draft_by_id(&self.db, draft_id)
            .await?
            .ok_or(AppError::NotFound)?;

        let now = Utc::now().to_rfc3339();
        let mut tx = self.db.begin().await?;

        sqlx::query(
            "UPDATE courses SET titulo = ?, slug = ?, descripcion_corta = ?, \
             descripcion_larga = ?, imagen_portada = ?, video_presentacion = ?, \
             modalidad = ?, nivel = ?, publico_objetivo = ?, precio = ?, activo = 1, \
             updated_at = ? WHERE id = ?",
        )
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
        .bind(&now)
        .bind(&draft.course_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM course_drafts WHERE id = ?")
            .bind(draft_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!("draft published: course={}", draft.course_id);

        courses::find_course_by_id(&self.db, &draft.course_id)
            .await?
            .ok_or(AppError::NotFound)
    }

    /// Discards the staged edit; the live course is untouched.
    pub async fn reject_draft(&self, draft_id: &str) -> Result<(), AppError> {
        let deleted = courses::delete_draft(&self.db, draft_id).await?;
        if !deleted {
            return Err(AppError::NotFound);
        }

        info!("draft rejected: id={}", draft_id);
        Ok(())
    }
}

/// Applies the submitted fields onto the live row and stamps updated_at.
fn patch_course(mut course: Course, edit: CourseEdit) -> Course {
    if let Some(titulo) = edit.titulo {
        course.titulo = titulo;
    }
    if let Some(slug) = edit.slug {
        course.slug = slug;
    }
    if let Some(v) = edit.descripcion_corta {
        course.descripcion_corta = Some(v);
    }
    if let Some(v) = edit.descripcion_larga {
        course.descripcion_larga = Some(v);
    }
    if let Some(v) = edit.imagen_portada {
        course.imagen_portada = Some(v);
    }
    if let Some(v) = edit.video_presentacion {
        course.video_presentacion = Some(v);
    }
    if let Some(v) = edit.modalidad {
        course.modalidad = Some(v);
    }
    if let Some(v) = edit.nivel {
        course.nivel = Some(v);
    }
    if let Some(v) = edit.publico_objetivo {
        course.publico_objetivo = Some(v);
    }
    if let Some(v) = edit.precio {
        course.precio = Some(v);
    }
    if let Some(v) = edit.activo {
        course.activo = v;
    }
    course.updated_at = Utc::now().to_rfc3339();
    course
}

/// Builds the full draft row from an edit. The NOT NULL fields fall
/// back to the live values when the edit omits them; nullable fields
/// mirror the submitted form verbatim.
fn draft_from_edit(course: &Course, profesor_id: &str, edit: &CourseEdit) -> CourseDraft {
    CourseDraft {
        id: Uuid::new_v4().to_string(),
        course_id: course.id.clone(),
        profesor_id: profesor_id.to_string(),
        titulo: edit.titulo.clone().unwrap_or_else(|| course.titulo.clone()),
        slug: edit.slug.clone().unwrap_or_else(|| course.slug.clone()),
        descripcion_corta: edit.descripcion_corta.clone(),
        descripcion_larga: edit.descripcion_larga.clone(),
        imagen_portada: edit.imagen_portada.clone(),
        video_presentacion: edit.video_presentacion.clone(),
        modalidad: edit.modalidad.clone(),
        nivel: edit.nivel.clone(),
        publico_objetivo: edit.publico_objetivo.clone(),
        precio: edit.precio,
        is_pending_review: true,
        updated_at: Utc::now().to_rfc3339(),
    }
}
