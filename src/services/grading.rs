use std::collections::{HashMap, HashSet};

use crate::models::{QuestionResult, QuizResult};

/// Grades a submission against the stored correct-option sets.
///
/// A question counts as correct only when the submitted option-id set
/// is exactly equal to the correct set; a partial or padded multi-select
/// answer scores as wrong. Questions the student skipped are graded
/// against the empty set. Answers for question ids that are not part of
/// the quiz are ignored.
pub fn grade(
    correct_sets: &[(String, Vec<String>)],
    answers: &HashMap<String, Vec<String>>,
) -> QuizResult {
    let mut score: u32 = 0;
    let mut results = HashMap::new();

    for (question_id, correct_ids) in correct_sets {
        let correct: HashSet<&str> = correct_ids.iter().map(String::as_str).collect();
        let submitted_ids = answers.get(question_id).cloned().unwrap_or_default();
        let submitted: HashSet<&str> = submitted_ids.iter().map(String::as_str).collect();

        let is_correct = correct == submitted;
        if is_correct {
            score += 1;
        }

        results.insert(
            question_id.clone(),
            QuestionResult {
                correct_option_ids: correct_ids.clone(),
                student_option_ids: submitted_ids,
                is_correct,
            },
        );
    }

    let total_questions = correct_sets.len() as u32;
    let percentage = if total_questions > 0 {
        f64::from(score) / f64::from(total_questions) * 100.0
    } else {
        0.0
    };

    QuizResult {
        score,
        total_questions,
        percentage,
        results,
    }
}
