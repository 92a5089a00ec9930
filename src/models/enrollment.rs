use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Lifecycle of an enrollment request. Terminal once decided; a
/// rejected request blocks resubmission for the same pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    pub fn as_lower(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EnrollmentRequest {
    pub id: String,
    pub user_id: String,
    pub course_id: String,
    pub status: RequestStatus,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Enrollment {
    pub id: String,
    pub user_id: String,
    pub course_id: String,
    pub created_at: String,
}

/// Admin listing row with requester and course details joined on.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct EnrollmentRequestRow {
    pub id: String,
    pub user_id: String,
    pub course_id: String,
    pub status: RequestStatus,
    pub created_at: String,
    pub user_nombre: Option<String>,
    pub user_email: Option<String>,
    pub course_titulo: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewEnrollmentRequest {
    pub course_id: String,
}

/// Decision body; the status arrives as a raw string so unknown values
/// can be rejected with a 400 instead of a deserialization error.
#[derive(Debug, Clone, Deserialize)]
pub struct DecisionRequest {
    pub status: String,
}

/// What a student sees for a (user, course) pair. The enrollment row is
/// the source of truth: once it exists the request status is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnrollmentStatus {
    Enrolled,
    Pending,
    Approved,
    Rejected,
    NotEnrolled,
}

impl From<RequestStatus> for EnrollmentStatus {
    fn from(status: RequestStatus) -> Self {
        match status {
            RequestStatus::Pending => EnrollmentStatus::Pending,
            RequestStatus::Approved => EnrollmentStatus::Approved,
            RequestStatus::Rejected => EnrollmentStatus::Rejected,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: EnrollmentStatus,
}
