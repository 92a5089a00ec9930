use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use crate::db::{courses, enrollments};
use crate::error::AppError;
use crate::models::{EnrollmentRequest, EnrollmentStatus, RequestStatus};

/// Tracks a student's relationship to a course:
/// NOT_ENROLLED -> PENDING -> {APPROVED, REJECTED}. Once an enrollment
/// row exists it is the source of truth, independent of the request.
pub struct EnrollmentService {
    db: SqlitePool,
}

impl EnrollmentService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Creates a PENDING request. Any existing enrollment or request for
    /// the pair is a conflict; a REJECTED request also blocks
    /// resubmission (matches the admin-mediated flow, where a rejected
    /// student has to be handled out of band).
    pub async fn request_enrollment(
        &self,
        user_id: &str,
        course_id: &str,
    ) -> Result<EnrollmentRequest, AppError> {
        if courses::find_course_by_id(&self.db, course_id).await?.is_none() {
            return Err(AppError::NotFound);
        }

        if enrollments::find_enrollment(&self.db, user_id, course_id).await?.is_some() {
            return Err(AppError::Conflict(
                "User is already enrolled in this course".to_string(),
            ));
        }

        if enrollments::find_request(&self.db, user_id, course_id).await?.is_some() {
            return Err(AppError::Conflict(
                "An enrollment request already exists for this course".to_string(),
            ));
        }

        // A concurrent duplicate slips past the checks above; the unique
        // index on (user_id, course_id) turns it into the same conflict.
        enrollments::insert_request(&self.db, user_id, course_id)
            .await
            .map_err(|e| {
                AppError::conflict_on_unique(
                    e,
                    "An enrollment request already exists for this course",
                )
            })
    }

    pub async fn status(
        &self,
        user_id: &str,
        course_id: &str,
    ) -> Result<EnrollmentStatus, AppError> {
        if enrollments::find_enrollment(&self.db, user_id, course_id).await?.is_some() {
            return Ok(EnrollmentStatus::Enrolled);
        }

        if let Some(request) = enrollments::find_request(&self.db, user_id, course_id).await? {
            return Ok(request.status.into());
        }

        Ok(EnrollmentStatus::NotEnrolled)
    }

    /// Approves or rejects a PENDING request. Approval inserts the
    /// enrollment and flips the request status in one transaction so a
    /// crash cannot leave an approved-but-unenrolled state.
    pub async fn decide(
        &self,
        request_id: &str,
        decision: RequestStatus,
    ) -> Result<EnrollmentRequest, AppError> {
        if decision == RequestStatus::Pending {
            return Err(AppError::BadRequest("Invalid status provided".to_string()));
        }

        let mut request = enrollments::find_request_by_id(&self.db, request_id)
            .await?
            .ok_or(AppError::NotFound)?;

        if request.status != RequestStatus::Pending {
            return Err(AppError::Conflict(format!(
                "Request has already been {}",
                request.status.as_lower()
            )));
        }

        if decision == RequestStatus::Approved {
            let enrollment_id = Uuid::new_v4().to_string();
            let now = Utc::now().to_rfc3339();

            let mut tx = self.db.begin().await?;

            sqlx::query(
                "INSERT INTO enrollments (id, user_id, course_id, created_at) \
                 VALUES (?, ?, ?, ?)",
            )
            .bind(&enrollment_id)
            .bind(&request.user_id)
            .bind(&request.course_id)
            .bind(&now)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::conflict_on_unique(e, "This user is already enrolled in the course")
            })?;

            sqlx::query("UPDATE enrollment_requests SET status = 'APPROVED' WHERE id = ?")
                .bind(request_id)
                .execute(&mut *tx)
                .await?;

            tx.commit().await?;

            info!(
                "enrollment approved: user={} course={}",
                request.user_id, request.course_id
            );
            request.status = RequestStatus::Approved;
        } else {
            sqlx::query("UPDATE enrollment_requests SET status = 'REJECTED' WHERE id = ?")
                .bind(request_id)
                .execute(&self.db)
                .await?;

            info!(
                "enrollment rejected: user={} course={}",
                request.user_id, request.course_id
            );
            request.status = RequestStatus::Rejected;
        }

        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewCourseRequest;
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

    async fn seed_course(pool: &SqlitePool, slug: &str) -> String {
        let req = NewCourseRequest {
            titulo: "Producción Audiovisual".to_string(),
            slug: slug.to_string(),
            descripcion_corta: None,
            descripcion_larga: None,
            imagen_portada: None,
            video_presentacion: None,
            modalidad: None,
            nivel: None,
            publico_objetivo: None,
            precio: Some(99.99),
            profesor_id: "prof-1".to_string(),
            activo: Some(true),
        };
        courses::insert_course(pool, req, true)
            .await
            .expect("Failed to insert course")
            .id
    }

    #[tokio::test]
    async fn test_request_creates_pending() {
        let pool = setup_test_db().await;
        let course_id = seed_course(&pool, "curso-a").await;
        let service = EnrollmentService::new(pool.clone());

        let request = service
            .request_enrollment("student-1", &course_id)
            .await
            .expect("Failed to request enrollment");

        assert_eq!(request.status, RequestStatus::Pending);
        assert_eq!(
            service.status("student-1", &course_id).await.unwrap(),
            EnrollmentStatus::Pending
        );
    }

    #[tokio::test]
    async fn test_request_unknown_course_is_not_found() {
        let pool = setup_test_db().await;
        let service = EnrollmentService::new(pool);

        let err = service
            .request_enrollment("student-1", "missing")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }

    #[tokio::test]
    async fn test_duplicate_request_conflicts() {
        let pool = setup_test_db().await;
        let course_id = seed_course(&pool, "curso-a").await;
        let service = EnrollmentService::new(pool.clone());

        service.request_enrollment("student-1", &course_id).await.unwrap();
        let err = service
            .request_enrollment("student-1", &course_id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_approve_enrolls_and_is_terminal() {
        let pool = setup_test_db().await;
        let course_id = seed_course(&pool, "curso-a").await;
        let service = EnrollmentService::new(pool.clone());

        let request = service.request_enrollment("student-1", &course_id).await.unwrap();
        let decided = service
            .decide(&request.id, RequestStatus::Approved)
            .await
            .expect("Failed to approve");
        assert_eq!(decided.status, RequestStatus::Approved);

        // Enrollment row is the source of truth now.
        assert_eq!(
            service.status("student-1", &course_id).await.unwrap(),
            EnrollmentStatus::Enrolled
        );
        let enrollment = enrollments::find_enrollment(&pool, "student-1", &course_id)
            .await
            .unwrap();
        assert!(enrollment.is_some());

        // Not re-approvable.
        let err = service
            .decide(&request.id, RequestStatus::Approved)
            .await
            .unwrap_err();
        match err {
            AppError::Conflict(msg) => assert!(msg.contains("approved")),
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_reject_blocks_resubmission() {
        let pool = setup_test_db().await;
        let course_id = seed_course(&pool, "curso-a").await;
        let service = EnrollmentService::new(pool.clone());

        let request = service.request_enrollment("student-1", &course_id).await.unwrap();
        service.decide(&request.id, RequestStatus::Rejected).await.unwrap();

        assert_eq!(
            service.status("student-1", &course_id).await.unwrap(),
            EnrollmentStatus::Rejected
        );
        // No enrollment was created.
        assert!(enrollments::find_enrollment(&pool, "student-1", &course_id)
            .await
            .unwrap()
            .is_none());

        // The rejected request still blocks a new one.
        let err = service
            .request_enrollment("student-1", &course_id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_decide_rejects_pending_as_decision() {
        let pool = setup_test_db().await;
        let course_id = seed_course(&pool, "curso-a").await;
        let service = EnrollmentService::new(pool.clone());

        let request = service.request_enrollment("student-1", &course_id).await.unwrap();
        let err = service
            .decide(&request.id, RequestStatus::Pending)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_decide_unknown_request_is_not_found() {
        let pool = setup_test_db().await;
        let service = EnrollmentService::new(pool);

        let err = service
            .decide("missing", RequestStatus::Approved)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }

    #[tokio::test]
    async fn test_status_without_history_is_not_enrolled() {
        let pool = setup_test_db().await;
        let course_id = seed_course(&pool, "curso-a").await;
        let service = EnrollmentService::new(pool);

        assert_eq!(
            service.status("stranger", &course_id).await.unwrap(),
            EnrollmentStatus::NotEnrolled
        );
    }
}
