pub mod course;
pub mod content;
pub mod enrollment;
pub mod exercise;
pub mod quiz;
pub mod user;

pub use course::{Course, CourseDraft, CourseEdit, CoursePage, NewCourseRequest, Pagination};
pub use content::{
    Class, ClassTree, CourseContent, Module, ModuleTree, NewClassRequest, NewModuleRequest,
    UpdateClassRequest, UpdateModuleRequest,
};
pub use enrollment::{
    DecisionRequest, Enrollment, EnrollmentRequest, EnrollmentRequestRow, EnrollmentStatus,
    NewEnrollmentRequest, RequestStatus, StatusResponse,
};
pub use exercise::{Exercise, ExerciseRequest};
pub use quiz::{
    NewOptionRequest, NewQuestionRequest, NewQuizRequest, Question, QuestionResult,
    QuestionTree, Quiz, QuizDetail, QuizOption, QuizResult, QuizSubmission, StudentOption,
    StudentQuestion, StudentQuiz, UpdateOptionRequest, UpdateQuestionRequest,
    UpdateQuizRequest,
};
pub use user::{NewUserRequest, User};
