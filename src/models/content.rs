use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::Course;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Module {
    pub id: String,
    pub course_id: String,
    pub titulo: String,
    pub position: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Class {
    pub id: String,
    pub module_id: String,
    pub titulo: String,
    pub tipo_contenido: String,
    pub contenido_texto: Option<String>,
    pub contenido_video: Option<String>,
    pub quiz_id: Option<String>,
    pub exercise_id: Option<String>,
    pub position: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewModuleRequest {
    pub titulo: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateModuleRequest {
    #[serde(default)]
    pub titulo: Option<String>,
    #[serde(default)]
    pub position: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewClassRequest {
    pub titulo: String,
    pub tipo_contenido: String,
    #[serde(default)]
    pub contenido_texto: Option<String>,
    #[serde(default)]
    pub contenido_video: Option<String>,
    #[serde(default)]
    pub quiz_id: Option<String>,
    #[serde(default)]
    pub exercise_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateClassRequest {
    #[serde(default)]
    pub titulo: Option<String>,
    #[serde(default)]
    pub tipo_contenido: Option<String>,
    #[serde(default)]
    pub contenido_texto: Option<String>,
    #[serde(default)]
    pub contenido_video: Option<String>,
    #[serde(default)]
    pub quiz_id: Option<String>,
    #[serde(default)]
    pub exercise_id: Option<String>,
    #[serde(default)]
    pub position: Option<i64>,
}

pub type ClassTree = Class;

#[derive(Debug, Serialize)]
pub struct ModuleTree {
    #[serde(flatten)]
    pub module: Module,
    pub clases: Vec<ClassTree>,
}

/// Full course tree served to enrolled students and course staff.
#[derive(Debug, Serialize)]
pub struct CourseContent {
    #[serde(flatten)]
    pub course: Course,
    pub modulos: Vec<ModuleTree>,
}
