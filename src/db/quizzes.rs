use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::{
    NewOptionRequest, NewQuestionRequest, Question, QuestionTree, Quiz, QuizDetail, QuizOption,
    StudentOption, StudentQuestion, StudentQuiz, UpdateOptionRequest, UpdateQuestionRequest,
};

pub async fn fetch_quizzes(db: &SqlitePool) -> Result<Vec<Quiz>, sqlx::Error> {
    sqlx::query_as::<_, Quiz>(
        "SELECT id, titulo, created_at FROM quizzes ORDER BY created_at DESC",
    )
    .fetch_all(db)
    .await
}

pub async fn find_quiz_by_id(db: &SqlitePool, id: &str) -> Result<Option<Quiz>, sqlx::Error> {
    sqlx::query_as::<_, Quiz>("SELECT id, titulo, created_at FROM quizzes WHERE id = ?")
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn insert_quiz(db: &SqlitePool, titulo: &str) -> Result<Quiz, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();

    sqlx::query("INSERT INTO quizzes (id, titulo, created_at) VALUES (?, ?, ?)")
        .bind(&id)
        .bind(titulo)
        .bind(&now)
        .execute(db)
        .await?;

    Ok(Quiz {
        id,
        titulo: titulo.to_string(),
        created_at: now,
    })
}

pub async fn update_quiz(db: &SqlitePool, id: &str, titulo: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE quizzes SET titulo = ? WHERE id = ?")
        .bind(titulo)
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}

pub async fn delete_quiz(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM quizzes WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}

pub async fn fetch_questions(db: &SqlitePool, quiz_id: &str) -> Result<Vec<Question>, sqlx::Error> {
    sqlx::query_as::<_, Question>(
        "SELECT id, quiz_id, texto, position FROM questions WHERE quiz_id = ? \
         ORDER BY position ASC",
    )
    .bind(quiz_id)
    .fetch_all(db)
    .await
}

pub async fn find_question_by_id(
    db: &SqlitePool,
    id: &str,
) -> Result<Option<Question>, sqlx::Error> {
    sqlx::query_as::<_, Question>(
        "SELECT id, quiz_id, texto, position FROM questions WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn insert_question(
    db: &SqlitePool,
    quiz_id: &str,
    req: NewQuestionRequest,
) -> Result<Question, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    // First question gets position 1.
    let position = sqlx::query_scalar::<_, i64>(
        "SELECT COALESCE(MAX(position), 0) + 1 FROM questions WHERE quiz_id = ?",
    )
    .bind(quiz_id)
    .fetch_one(db)
    .await?;

    sqlx::query("INSERT INTO questions (id, quiz_id, texto, position) VALUES (?, ?, ?, ?)")
        .bind(&id)
        .bind(quiz_id)
        .bind(&req.texto)
        .bind(position)
        .execute(db)
        .await?;

    Ok(Question {
        id,
        quiz_id: quiz_id.to_string(),
        texto: req.texto,
        position,
    })
}

pub async fn update_question(
    db: &SqlitePool,
    id: &str,
    req: UpdateQuestionRequest,
) -> Result<Option<Question>, sqlx::Error> {
    let mut current = match find_question_by_id(db, id).await? {
        Some(q) => q,
        None => return Ok(None),
    };

    if let Some(texto) = req.texto {
        current.texto = texto;
    }
    if let Some(position) = req.position {
        current.position = position;
    }

    sqlx::query("UPDATE questions SET texto = ?, position = ? WHERE id = ?")
        .bind(&current.texto)
        .bind(current.position)
        .bind(id)
        .execute(db)
        .await?;

    Ok(Some(current))
}

pub async fn delete_question(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM questions WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}

pub async fn fetch_options(
    db: &SqlitePool,
    question_id: &str,
) -> Result<Vec<QuizOption>, sqlx::Error> {
    // Options carry no position column; rowid keeps insertion order stable.
    sqlx::query_as::<_, QuizOption>(
        "SELECT id, question_id, texto, es_correcta FROM options WHERE question_id = ? \
         ORDER BY rowid ASC",
    )
    .bind(question_id)
    .fetch_all(db)
    .await
}

pub async fn find_option_by_id(
    db: &SqlitePool,
    id: &str,
) -> Result<Option<QuizOption>, sqlx::Error> {
    sqlx::query_as::<_, QuizOption>(
        "SELECT id, question_id, texto, es_correcta FROM options WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn insert_option(
    db: &SqlitePool,
    question_id: &str,
    req: NewOptionRequest,
) -> Result<QuizOption, sqlx::Error> {
    let id = Uuid::new_v4().to_string();

    sqlx::query("INSERT INTO options (id, question_id, texto, es_correcta) VALUES (?, ?, ?, ?)")
        .bind(&id)
        .bind(question_id)
        .bind(&req.texto)
        .bind(req.es_correcta)
        .execute(db)
        .await?;

    Ok(QuizOption {
        id,
        question_id: question_id.to_string(),
        texto: req.texto,
        es_correcta: req.es_correcta,
    })
}

pub async fn update_option(
    db: &SqlitePool,
    id: &str,
    req: UpdateOptionRequest,
) -> Result<Option<QuizOption>, sqlx::Error> {
    let mut current = match find_option_by_id(db, id).await? {
        Some(o) => o,
        None => return Ok(None),
    };

    if let Some(texto) = req.texto {
        current.texto = texto;
    }
    if let Some(es_correcta) = req.es_correcta {
        current.es_correcta = es_correcta;
    }

    sqlx::query("UPDATE options SET texto = ?, es_correcta = ? WHERE id = ?")
        .bind(&current.texto)
        .bind(current.es_correcta)
        .bind(id)
        .execute(db)
        .await?;

    Ok(Some(current))
}

pub async fn delete_option(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM options WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}

/// Authoring view with correctness flags included.
pub async fn fetch_quiz_detail(db: &SqlitePool, id: &str) -> Result<Option<QuizDetail>, sqlx::Error> {
    let quiz = match find_quiz_by_id(db, id).await? {
        Some(q) => q,
        None => return Ok(None),
    };

    let mut preguntas = Vec::new();
    for question in fetch_questions(db, id).await? {
        let opciones = fetch_options(db, &question.id).await?;
        preguntas.push(QuestionTree { question, opciones });
    }

    Ok(Some(QuizDetail { quiz, preguntas }))
}

/// Student view. Options carry only id and text; `es_correcta` stays
/// server-side until grading.
pub async fn fetch_student_quiz(
    db: &SqlitePool,
    id: &str,
) -> Result<Option<StudentQuiz>, sqlx::Error> {
    let quiz = match find_quiz_by_id(db, id).await? {
        Some(q) => q,
        None => return Ok(None),
    };

    let mut preguntas = Vec::new();
    for question in fetch_questions(db, id).await? {
        let opciones = sqlx::query_as::<_, StudentOption>(
            "SELECT id, texto FROM options WHERE question_id = ? ORDER BY rowid ASC",
        )
        .bind(&question.id)
        .fetch_all(db)
        .await?;

        preguntas.push(StudentQuestion {
            id: question.id,
            texto: question.texto,
            position: question.position,
            opciones,
        });
    }

    Ok(Some(StudentQuiz {
        id: quiz.id,
        titulo: quiz.titulo,
        preguntas,
    }))
}

/// Per-question correct option id sets, for grading.
pub async fn fetch_correct_option_sets(
    db: &SqlitePool,
    quiz_id: &str,
) -> Result<Vec<(String, Vec<String>)>, sqlx::Error> {
    let mut sets = Vec::new();
    for question in fetch_questions(db, quiz_id).await? {
        let correct = sqlx::query_scalar::<_, String>(
            "SELECT id FROM options WHERE question_id = ? AND es_correcta = 1",
        )
        .bind(&question.id)
        .fetch_all(db)
        .await?;
        sets.push((question.id, correct));
    }

    Ok(sets)
}

/// Resolves the course a quiz belongs to through its class/module
/// attachment. None means the quiz is not reachable by students.
pub async fn find_course_for_quiz(
    db: &SqlitePool,
    quiz_id: &str,
) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>(
        "SELECT m.course_id FROM classes c JOIN modules m ON m.id = c.module_id \
         WHERE c.quiz_id = ? LIMIT 1",
    )
    .bind(quiz_id)
    .fetch_optional(db)
    .await
}
