pub mod course_workflow;
pub mod enrollment;
pub mod grading;

pub use course_workflow::{CourseWorkflow, EditOutcome};
pub use enrollment::EnrollmentService;
