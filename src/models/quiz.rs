use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Quiz {
    pub id: String,
    pub titulo: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Question {
    pub id: String,
    pub quiz_id: String,
    pub texto: String,
    pub position: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QuizOption {
    pub id: String,
    pub question_id: String,
    pub texto: String,
    pub es_correcta: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewQuizRequest {
    pub titulo: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateQuizRequest {
    pub titulo: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewQuestionRequest {
    pub texto: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateQuestionRequest {
    #[serde(default)]
    pub texto: Option<String>,
    #[serde(default)]
    pub position: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOptionRequest {
    pub texto: String,
    #[serde(default)]
    pub es_correcta: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateOptionRequest {
    #[serde(default)]
    pub texto: Option<String>,
    #[serde(default)]
    pub es_correcta: Option<bool>,
}

/// Authoring view: full tree including correctness flags.
#[derive(Debug, Serialize)]
pub struct QuestionTree {
    #[serde(flatten)]
    pub question: Question,
    pub opciones: Vec<QuizOption>,
}

#[derive(Debug, Serialize)]
pub struct QuizDetail {
    #[serde(flatten)]
    pub quiz: Quiz,
    pub preguntas: Vec<QuestionTree>,
}

/// Student view: options stripped down to id and text. `es_correcta`
/// must never appear on this path.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StudentOption {
    pub id: String,
    pub texto: String,
}

#[derive(Debug, Serialize)]
pub struct StudentQuestion {
    pub id: String,
    pub texto: String,
    pub position: i64,
    pub opciones: Vec<StudentOption>,
}

#[derive(Debug, Serialize)]
pub struct StudentQuiz {
    pub id: String,
    pub titulo: String,
    pub preguntas: Vec<StudentQuestion>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuizSubmission {
    pub answers: HashMap<String, Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionResult {
    pub correct_option_ids: Vec<String>,
    pub student_option_ids: Vec<String>,
    pub is_correct: bool,
}

#[derive(Debug, Serialize)]
pub struct QuizResult {
    pub score: u32,
    pub total_questions: u32,
    pub percentage: f64,
    pub results: HashMap<String, QuestionResult>,
}
