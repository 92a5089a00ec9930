pub mod content;
pub mod courses;
pub mod enrollments;
pub mod exercises;
pub mod quizzes;
pub mod users;
