use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::Exercise;

pub async fn fetch_exercises(db: &SqlitePool) -> Result<Vec<Exercise>, sqlx::Error> {
    sqlx::query_as::<_, Exercise>(
        "SELECT id, instrucciones, created_at FROM exercises ORDER BY created_at DESC",
    )
    .fetch_all(db)
    .await
}

pub async fn find_exercise_by_id(
    db: &SqlitePool,
    id: &str,
) -> Result<Option<Exercise>, sqlx::Error> {
    sqlx::query_as::<_, Exercise>(
        "SELECT id, instrucciones, created_at FROM exercises WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn insert_exercise(db: &SqlitePool, instrucciones: &str) -> Result<Exercise, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();

    sqlx::query("INSERT INTO exercises (id, instrucciones, created_at) VALUES (?, ?, ?)")
        .bind(&id)
        .bind(instrucciones)
        .bind(&now)
        .execute(db)
        .await?;

    Ok(Exercise {
        id,
        instrucciones: instrucciones.to_string(),
        created_at: now,
    })
}

pub async fn update_exercise(
    db: &SqlitePool,
    id: &str,
    instrucciones: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE exercises SET instrucciones = ? WHERE id = ?")
        .bind(instrucciones)
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}

pub async fn delete_exercise(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM exercises WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}

/// An exercise attached to any class must not be deleted.
pub async fn exercise_in_use(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM classes WHERE exercise_id = ?")
        .bind(id)
        .fetch_one(db)
        .await?;

    Ok(count > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{content, courses};
    use crate::models::{NewClassRequest, NewCourseRequest, NewModuleRequest};
    use sqlx::sqlite::SqlitePoolOptions;

    async fn setup_test_db() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create test db");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        pool
    }

    #[tokio::test]
    async fn test_exercise_in_use_tracks_class_attachment() {
        let pool = setup_test_db().await;

        let exercise = insert_exercise(&pool, "Graba un plano secuencia").await.unwrap();
        assert!(!exercise_in_use(&pool, &exercise.id).await.unwrap());

        let course = courses::insert_course(
            &pool,
            NewCourseRequest {
                titulo: "Curso".to_string(),
                slug: "curso".to_string(),
                descripcion_corta: None,
                descripcion_larga: None,
                imagen_portada: None,
                video_presentacion: None,
                modalidad: None,
                nivel: None,
                publico_objetivo: None,
                precio: None,
                profesor_id: "prof-1".to_string(),
                activo: None,
            },
            true,
        )
        .await
        .unwrap();
        let module = content::insert_module(
            &pool,
            &course.id,
            NewModuleRequest { titulo: "Módulo 1".to_string() },
        )
        .await
        .unwrap();
        let class = content::insert_class(
            &pool,
            &module.id,
            NewClassRequest {
                titulo: "Práctica".to_string(),
                tipo_contenido: "Ejercicio".to_string(),
                contenido_texto: None,
                contenido_video: None,
                quiz_id: None,
                exercise_id: Some(exercise.id.clone()),
            },
        )
        .await
        .unwrap();

        assert!(exercise_in_use(&pool, &exercise.id).await.unwrap());

        content::delete_class(&pool, &class.id).await.unwrap();
        assert!(!exercise_in_use(&pool, &exercise.id).await.unwrap());
    }
}
