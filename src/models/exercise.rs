use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A standalone practice assignment. Classes reference exercises the
/// same way they reference quizzes.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Exercise {
    pub id: String,
    pub instrucciones: String,
    pub created_at: String,
}

/// Create and update share the same body: instrucciones is the whole
/// payload and is always required.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseRequest {
    pub instrucciones: String,
}
