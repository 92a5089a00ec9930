use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::{NewUserRequest, User};

pub async fn insert_user(db: &SqlitePool, req: NewUserRequest) -> Result<User, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();

    sqlx::query("INSERT INTO users (id, email, nombre_completo, created_at) VALUES (?, ?, ?, ?)")
        .bind(&id)
        .bind(&req.email)
        .bind(&req.nombre_completo)
        .bind(&now)
        .execute(db)
        .await?;

    Ok(User {
        id,
        email: req.email,
        nombre_completo: req.nombre_completo,
        created_at: now,
    })
}

pub async fn fetch_users(db: &SqlitePool) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "SELECT id, email, nombre_completo, created_at FROM users ORDER BY created_at DESC",
    )
    .fetch_all(db)
    .await
}
