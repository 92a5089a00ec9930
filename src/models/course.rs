use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Course {
    pub id: String,
    pub titulo: String,
    pub slug: String,
    pub descripcion_corta: Option<String>,
    pub descripcion_larga: Option<String>,
    pub imagen_portada: Option<String>,
    pub video_presentacion: Option<String>,
    pub modalidad: Option<String>,
    pub nivel: Option<String>,
    pub publico_objetivo: Option<String>,
    pub precio: Option<f64>,
    pub activo: bool,
    pub profesor_id: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Staged copy of edits to a live course, awaiting admin review.
/// At most one per course; a later edit replaces the whole row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CourseDraft {
    pub id: String,
    pub course_id: String,
    pub profesor_id: String,
    pub titulo: String,
    pub slug: String,
    pub descripcion_corta: Option<String>,
    pub descripcion_larga: Option<String>,
    pub imagen_portada: Option<String>,
    pub video_presentacion: Option<String>,
    pub modalidad: Option<String>,
    pub nivel: Option<String>,
    pub publico_objetivo: Option<String>,
    pub precio: Option<f64>,
    pub is_pending_review: bool,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCourseRequest {
    pub titulo: String,
    pub slug: String,
    #[serde(default)]
    pub descripcion_corta: Option<String>,
    #[serde(default)]
    pub descripcion_larga: Option<String>,
    #[serde(default)]
    pub imagen_portada: Option<String>,
    #[serde(default)]
    pub video_presentacion: Option<String>,
    #[serde(default)]
    pub modalidad: Option<String>,
    #[serde(default)]
    pub nivel: Option<String>,
    #[serde(default)]
    pub publico_objetivo: Option<String>,
    #[serde(default)]
    pub precio: Option<f64>,
    pub profesor_id: String,
    #[serde(default)]
    pub activo: Option<bool>,
}

/// Partial update body for a course. Omitted fields are left untouched
/// on a direct update; on a draft save the nullable fields are copied
/// verbatim (the draft mirrors the submitted form, not the live row).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CourseEdit {
    #[serde(default)]
    pub titulo: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub descripcion_corta: Option<String>,
    #[serde(default)]
    pub descripcion_larga: Option<String>,
    #[serde(default)]
    pub imagen_portada: Option<String>,
    #[serde(default)]
    pub video_presentacion: Option<String>,
    #[serde(default)]
    pub modalidad: Option<String>,
    #[serde(default)]
    pub nivel: Option<String>,
    #[serde(default)]
    pub publico_objetivo: Option<String>,
    #[serde(default)]
    pub precio: Option<f64>,
    #[serde(default)]
    pub activo: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct Pagination {
    pub total_items: i64,
    pub total_pages: i64,
    pub current_page: i64,
    pub page_size: i64,
}

#[derive(Debug, Serialize)]
pub struct CoursePage {
    pub data: Vec<Course>,
    pub pagination: Pagination,
}
