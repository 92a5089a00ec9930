use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::{
    Class, CourseContent, Module, ModuleTree, NewClassRequest, NewModuleRequest,
    UpdateClassRequest, UpdateModuleRequest,
};

const CLASS_COLUMNS: &str = "id, module_id, titulo, tipo_contenido, contenido_texto, \
     contenido_video, quiz_id, exercise_id, position";

pub async fn fetch_modules(db: &SqlitePool, course_id: &str) -> Result<Vec<Module>, sqlx::Error> {
    sqlx::query_as::<_, Module>(
        "SELECT id, course_id, titulo, position FROM modules WHERE course_id = ? \
         ORDER BY position ASC",
    )
    .bind(course_id)
    .fetch_all(db)
    .await
}

pub async fn find_module_by_id(db: &SqlitePool, id: &str) -> Result<Option<Module>, sqlx::Error> {
    sqlx::query_as::<_, Module>(
        "SELECT id, course_id, titulo, position FROM modules WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn insert_module(
    db: &SqlitePool,
    course_id: &str,
    req: NewModuleRequest,
) -> Result<Module, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let position = sqlx::query_scalar::<_, i64>(
        "SELECT COALESCE(MAX(position), 0) + 1 FROM modules WHERE course_id = ?",
    )
    .bind(course_id)
    .fetch_one(db)
    .await?;

    sqlx::query("INSERT INTO modules (id, course_id, titulo, position) VALUES (?, ?, ?, ?)")
        .bind(&id)
        .bind(course_id)
        .bind(&req.titulo)
        .bind(position)
        .execute(db)
        .await?;

    Ok(Module {
        id,
        course_id: course_id.to_string(),
        titulo: req.titulo,
        position,
    })
}

pub async fn update_module(
    db: &SqlitePool,
    id: &str,
    req: UpdateModuleRequest,
) -> Result<Option<Module>, sqlx::Error> {
    let mut current = match find_module_by_id(db, id).await? {
        Some(m) => m,
        None => return Ok(None),
    };

    if let Some(titulo) = req.titulo {
        current.titulo = titulo;
    }
    if let Some(position) = req.position {
        current.position = position;
    }

    sqlx::query("UPDATE modules SET titulo = ?, position = ? WHERE id = ?")
        .bind(&current.titulo)
        .bind(current.position)
        .bind(id)
        .execute(db)
        .await?;

    Ok(Some(current))
}

pub async fn delete_module(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM modules WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}

pub async fn fetch_classes(db: &SqlitePool, module_id: &str) -> Result<Vec<Class>, sqlx::Error> {
    let sql = format!("SELECT {CLASS_COLUMNS} FROM classes WHERE module_id = ? ORDER BY position ASC");
    sqlx::query_as::<_, Class>(&sql).bind(module_id).fetch_all(db).await
}

pub async fn find_class_by_id(db: &SqlitePool, id: &str) -> Result<Option<Class>, sqlx::Error> {
    let sql = format!("SELECT {CLASS_COLUMNS} FROM classes WHERE id = ?");
    sqlx::query_as::<_, Class>(&sql).bind(id).fetch_optional(db).await
}

pub async fn insert_class(
    db: &SqlitePool,
    module_id: &str,
    req: NewClassRequest,
) -> Result<Class, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let position = sqlx::query_scalar::<_, i64>(
        "SELECT COALESCE(MAX(position), 0) + 1 FROM classes WHERE module_id = ?",
    )
    .bind(module_id)
    .fetch_one(db)
    .await?;

    sqlx::query(
        "INSERT INTO classes (id, module_id, titulo, tipo_contenido, contenido_texto, \
         contenido_video, quiz_id, exercise_id, position) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(module_id)
    .bind(&req.titulo)
    .bind(&req.tipo_contenido)
    .bind(&req.contenido_texto)
    .bind(&req.contenido_video)
    .bind(&req.quiz_id)
    .bind(&req.exercise_id)
    .bind(position)
    .execute(db)
    .await?;

    Ok(Class {
        id,
        module_id: module_id.to_string(),
        titulo: req.titulo,
        tipo_contenido: req.tipo_contenido,
        contenido_texto: req.contenido_texto,
        contenido_video: req.contenido_video,
        quiz_id: req.quiz_id,
        exercise_id: req.exercise_id,
        position,
    })
}

pub async fn update_class(
    db: &SqlitePool,
    id: &str,
    req: UpdateClassRequest,
) -> Result<Option<Class>, sqlx::Error> {
    let mut current = match find_class_by_id(db, id).await? {
        Some(c) => c,
        None => return Ok(None),
    };

    if let Some(titulo) = req.titulo {
        current.titulo = titulo;
    }
    if let Some(tipo) = req.tipo_contenido {
        current.tipo_contenido = tipo;
    }
    if let Some(texto) = req.contenido_texto {
        current.contenido_texto = Some(texto);
    }
    if let Some(video) = req.contenido_video {
        current.contenido_video = Some(video);
    }
    if let Some(quiz_id) = req.quiz_id {
        current.quiz_id = Some(quiz_id);
    }
    if let Some(exercise_id) = req.exercise_id {
        current.exercise_id = Some(exercise_id);
    }
    if let Some(position) = req.position {
        current.position = position;
    }

    sqlx::query(
        "UPDATE classes SET titulo = ?, tipo_contenido = ?, contenido_texto = ?, \
         contenido_video = ?, quiz_id = ?, exercise_id = ?, position = ? WHERE id = ?",
    )
    .bind(&current.titulo)
    .bind(&current.tipo_contenido)
    .bind(&current.contenido_texto)
    .bind(&current.contenido_video)
    .bind(&current.quiz_id)
    .bind(&current.exercise_id)
    .bind(current.position)
    .bind(id)
    .execute(db)
    .await?;

    Ok(Some(current))
}

pub async fn delete_class(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM classes WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}

/// Assembles the ordered module/class tree for one course.
pub async fn fetch_course_content(
    db: &SqlitePool,
    course_id: &str,
) -> Result<Option<CourseContent>, sqlx::Error> {
    let course = match crate::db::courses::find_course_by_id(db, course_id).await? {
        Some(c) => c,
        None => return Ok(None),
    };

    let mut modulos = Vec::new();
    for module in fetch_modules(db, course_id).await? {
        let clases = fetch_classes(db, &module.id).await?;
        modulos.push(ModuleTree { module, clases });
    }

    Ok(Some(CourseContent { course, modulos }))
}
