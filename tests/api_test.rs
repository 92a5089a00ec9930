use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

use aula_backend::api::router;
use aula_backend::db;
use aula_backend::models::{NewClassRequest, NewCourseRequest, NewModuleRequest, NewOptionRequest, NewQuestionRequest};
use aula_backend::state::AppState;

async fn setup_app() -> (Router, SqlitePool) {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create test db");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    let app = router(AppState { db: pool.clone() });
    (app, pool)
}

fn request(
    method: &str,
    uri: &str,
    identity: Option<(&str, &str)>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some((user_id, roles)) = identity {
        builder = builder.header("x-user-id", user_id).header("x-user-roles", roles);
    }

    match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("response was not JSON")
}

fn course_req(slug: &str, profesor_id: &str) -> NewCourseRequest {
    NewCourseRequest {
        titulo: "Producción Audiovisual Básica".to_string(),
        slug: slug.to_string(),
        descripcion_corta: Some("Fundamentos de video y audio".to_string()),
        descripcion_larga: None,
        imagen_portada: None,
        video_presentacion: None,
        modalidad: Some("OnlineGrabado".to_string()),
        nivel: Some("Basico".to_string()),
        publico_objetivo: None,
        precio: Some(99.99),
        profesor_id: profesor_id.to_string(),
        activo: None,
    }
}

#[tokio::test]
async fn test_health() {
    let (app, _pool) = setup_app().await;

    let response = app.oneshot(request("GET", "/health", None, None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_catalog_is_public_and_only_lists_live_courses() {
    let (app, pool) = setup_app().await;

    db::courses::insert_course(&pool, course_req("curso-vivo", "prof-1"), true)
        .await
        .unwrap();
    db::courses::insert_course(&pool, course_req("curso-borrador", "prof-1"), false)
        .await
        .unwrap();

    let response = app.oneshot(request("GET", "/catalog", None, None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["slug"], "curso-vivo");
}

#[tokio::test]
async fn test_course_admin_routes_require_identity_and_role() {
    let (app, _pool) = setup_app().await;

    // No identity header at all.
    let response = app
        .clone()
        .oneshot(request("GET", "/courses", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // A student has no business in the admin area.
    let response = app
        .oneshot(request("GET", "/courses", Some(("student-1", "student")), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_instructor_edit_of_live_course_is_staged_as_draft() {
    let (app, pool) = setup_app().await;

    let course = db::courses::insert_course(&pool, course_req("curso-a", "prof-1"), true)
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(request(
            "PUT",
            &format!("/courses/{}", course.id),
            Some(("prof-1", "instructor")),
            Some(serde_json::json!({ "titulo": "Título Revisado" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["message"], "Changes saved as draft for review.");
    assert_eq!(body["draft"]["titulo"], "Título Revisado");
    assert_eq!(body["draft"]["is_pending_review"], true);

    // The live row is unchanged.
    let response = app
        .oneshot(request(
            "GET",
            &format!("/courses/{}", course.id),
            Some(("admin-1", "super-admin")),
            None,
        ))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["titulo"], "Producción Audiovisual Básica");
}

#[tokio::test]
async fn test_publish_draft_requires_super_admin() {
    let (app, pool) = setup_app().await;

    let course = db::courses::insert_course(&pool, course_req("curso-a", "prof-1"), true)
        .await
        .unwrap();

    app.clone()
        .oneshot(request(
            "PUT",
            &format!("/courses/{}", course.id),
            Some(("prof-1", "instructor")),
            Some(serde_json::json!({ "titulo": "Nuevo" })),
        ))
        .await
        .unwrap();
    let draft = db::courses::find_draft_for_course(&pool, &course.id)
        .await
        .unwrap()
        .unwrap();

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            &format!("/drafts/{}/publish", draft.id),
            Some(("prof-1", "instructor")),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .oneshot(request(
            "POST",
            &format!("/drafts/{}/publish", draft.id),
            Some(("admin-1", "super-admin")),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let live = db::courses::find_course_by_id(&pool, &course.id).await.unwrap().unwrap();
    assert_eq!(live.titulo, "Nuevo");
    assert!(live.activo);
    assert!(db::courses::find_draft_for_course(&pool, &course.id)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_only_students_can_request_enrollment() {
    let (app, pool) = setup_app().await;

    let course = db::courses::insert_course(&pool, course_req("curso-a", "prof-1"), true)
        .await
        .unwrap();
    let body = serde_json::json!({ "course_id": course.id });

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/enrollments/requests",
            Some(("prof-1", "instructor")),
            Some(body.clone()),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .oneshot(request(
            "POST",
            "/enrollments/requests",
            Some(("student-1", "student")),
            Some(body),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_enrollment_request_and_approval_flow() {
    let (app, pool) = setup_app().await;

    let course = db::courses::insert_course(&pool, course_req("curso-a", "prof-1"), true)
        .await
        .unwrap();
    let student = ("student-1", "student");
    let admin = ("admin-1", "enrollment-admin");

    // Request enrollment.
    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/enrollments/requests",
            Some(student),
            Some(serde_json::json!({ "course_id": course.id })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    assert_eq!(body["status"], "PENDING");
    let request_id = body["id"].as_str().unwrap().to_string();

    // Duplicate request conflicts.
    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/enrollments/requests",
            Some(student),
            Some(serde_json::json!({ "course_id": course.id })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Admin sees it in the pending listing.
    let response = app
        .clone()
        .oneshot(request(
            "GET",
            "/enrollments/requests?status=PENDING",
            Some(admin),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    // Invalid decision value is a 400.
    let response = app
        .clone()
        .oneshot(request(
            "PUT",
            &format!("/enrollments/requests/{request_id}"),
            Some(admin),
            Some(serde_json::json!({ "status": "MAYBE" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Approve.
    let response = app
        .clone()
        .oneshot(request(
            "PUT",
            &format!("/enrollments/requests/{request_id}"),
            Some(admin),
            Some(serde_json::json!({ "status": "APPROVED" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Status now reads from the enrollment row.
    let response = app
        .clone()
        .oneshot(request(
            "GET",
            &format!("/enrollments/status?course_id={}", course.id),
            Some(student),
            None,
        ))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["status"], "ENROLLED");

    // A decided request cannot be decided again.
    let response = app
        .oneshot(request(
            "PUT",
            &format!("/enrollments/requests/{request_id}"),
            Some(admin),
            Some(serde_json::json!({ "status": "REJECTED" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

fn submission(question_id: &str, options: &[&String]) -> serde_json::Value {
    let mut answers = serde_json::Map::new();
    answers.insert(
        question_id.to_string(),
        serde_json::json!(options.iter().map(|o| o.as_str()).collect::<Vec<_>>()),
    );
    serde_json::json!({ "answers": answers })
}

async fn seed_quiz_in_course(pool: &SqlitePool, course_id: &str) -> (String, String, String, String) {
    let quiz = db::quizzes::insert_quiz(pool, "Quiz de Edición").await.unwrap();
    let question = db::quizzes::insert_question(
        pool,
        &quiz.id,
        NewQuestionRequest { texto: "¿Qué es un corte?".to_string() },
    )
    .await
    .unwrap();

    let a = db::quizzes::insert_option(
        pool,
        &question.id,
        NewOptionRequest { texto: "Opción A".to_string(), es_correcta: true },
    )
    .await
    .unwrap();
    db::quizzes::insert_option(
        pool,
        &question.id,
        NewOptionRequest { texto: "Opción B".to_string(), es_correcta: false },
    )
    .await
    .unwrap();
    let c = db::quizzes::insert_option(
        pool,
        &question.id,
        NewOptionRequest { texto: "Opción C".to_string(), es_correcta: true },
    )
    .await
    .unwrap();

    let module = db::content::insert_module(
        pool,
        course_id,
        NewModuleRequest { titulo: "Módulo 1".to_string() },
    )
    .await
    .unwrap();
    db::content::insert_class(
        pool,
        &module.id,
        NewClassRequest {
            titulo: "Clase con quiz".to_string(),
            tipo_contenido: "Quiz".to_string(),
            contenido_texto: None,
            contenido_video: None,
            quiz_id: Some(quiz.id.clone()),
            exercise_id: None,
        },
    )
    .await
    .unwrap();

    (quiz.id, question.id, a.id, c.id)
}

async fn enroll(pool: &SqlitePool, user_id: &str, course_id: &str) {
    let service = aula_backend::services::EnrollmentService::new(pool.clone());
    let req = service.request_enrollment(user_id, course_id).await.unwrap();
    service
        .decide(&req.id, aula_backend::models::RequestStatus::Approved)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_student_quiz_fetch_never_reveals_correctness() {
    let (app, pool) = setup_app().await;

    let course = db::courses::insert_course(&pool, course_req("curso-a", "prof-1"), true)
        .await
        .unwrap();
    let (quiz_id, _q, _a, _c) = seed_quiz_in_course(&pool, &course.id).await;
    enroll(&pool, "student-1", &course.id).await;

    let response = app
        .oneshot(request(
            "GET",
            &format!("/student/quizzes/{quiz_id}"),
            Some(("student-1", "student")),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let raw = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(!raw.contains("es_correcta"));

    let body: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(body["preguntas"].as_array().unwrap().len(), 1);
    assert_eq!(body["preguntas"][0]["opciones"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_unenrolled_student_cannot_take_quiz() {
    let (app, pool) = setup_app().await;

    let course = db::courses::insert_course(&pool, course_req("curso-a", "prof-1"), true)
        .await
        .unwrap();
    let (quiz_id, _q, _a, _c) = seed_quiz_in_course(&pool, &course.id).await;

    let response = app
        .oneshot(request(
            "GET",
            &format!("/student/quizzes/{quiz_id}"),
            Some(("student-1", "student")),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_quiz_not_attached_to_a_class_is_not_found() {
    let (app, pool) = setup_app().await;

    let quiz = db::quizzes::insert_quiz(&pool, "Huérfano").await.unwrap();

    let response = app
        .oneshot(request(
            "GET",
            &format!("/student/quizzes/{}", quiz.id),
            Some(("student-1", "student")),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_quiz_submission_grades_by_exact_set_equality() {
    let (app, pool) = setup_app().await;

    let course = db::courses::insert_course(&pool, course_req("curso-a", "prof-1"), true)
        .await
        .unwrap();
    let (quiz_id, question_id, opt_a, opt_c) = seed_quiz_in_course(&pool, &course.id).await;
    enroll(&pool, "student-1", &course.id).await;

    // Exact match: correct.
    let response = app
        .clone()
        .oneshot(request(
            "POST",
            &format!("/student/quizzes/{quiz_id}/submit"),
            Some(("student-1", "student")),
            Some(submission(&question_id, &[&opt_a, &opt_c])),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["score"], 1);
    assert_eq!(body["total_questions"], 1);
    assert_eq!(body["percentage"], 100.0);
    assert_eq!(body["results"][&question_id]["is_correct"], true);

    // Partial answer: wrong under the exact-set rule.
    let response = app
        .oneshot(request(
            "POST",
            &format!("/student/quizzes/{quiz_id}/submit"),
            Some(("student-1", "student")),
            Some(submission(&question_id, &[&opt_a])),
        ))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["score"], 0);
    assert_eq!(body["percentage"], 0.0);
    assert_eq!(body["results"][&question_id]["is_correct"], false);
}

#[tokio::test]
async fn test_course_content_requires_enrollment_or_staff() {
    let (app, pool) = setup_app().await;

    let course = db::courses::insert_course(&pool, course_req("curso-a", "prof-1"), true)
        .await
        .unwrap();
    seed_quiz_in_course(&pool, &course.id).await;

    // Stranger is refused.
    let response = app
        .clone()
        .oneshot(request(
            "GET",
            &format!("/courses/{}/content", course.id),
            Some(("student-1", "student")),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Owner sees the tree.
    let response = app
        .clone()
        .oneshot(request(
            "GET",
            &format!("/courses/{}/content", course.id),
            Some(("prof-1", "instructor")),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["modulos"].as_array().unwrap().len(), 1);
    assert_eq!(body["modulos"][0]["clases"].as_array().unwrap().len(), 1);

    // Enrolled student too.
    enroll(&pool, "student-1", &course.id).await;
    let response = app
        .oneshot(request(
            "GET",
            &format!("/courses/{}/content", course.id),
            Some(("student-1", "student")),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_exercise_crud_and_delete_guard() {
    let (app, pool) = setup_app().await;
    let instructor = Some(("prof-1", "instructor"));

    // Students never author exercises.
    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/exercises",
            Some(("student-1", "student")),
            Some(serde_json::json!({ "instrucciones": "Practica" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Instructions are mandatory.
    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/exercises",
            instructor,
            Some(serde_json::json!({ "instrucciones": "  " })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/exercises",
            instructor,
            Some(serde_json::json!({ "instrucciones": "Graba un plano secuencia" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let exercise = json_body(response).await;
    let exercise_id = exercise["id"].as_str().unwrap().to_string();

    // Attach the exercise to a class; deletion is now refused.
    let course = db::courses::insert_course(&pool, course_req("curso-a", "prof-1"), true)
        .await
        .unwrap();
    let module = db::content::insert_module(
        &pool,
        &course.id,
        NewModuleRequest { titulo: "Módulo 1".to_string() },
    )
    .await
    .unwrap();
    let class = db::content::insert_class(
        &pool,
        &module.id,
        NewClassRequest {
            titulo: "Práctica".to_string(),
            tipo_contenido: "Ejercicio".to_string(),
            contenido_texto: None,
            contenido_video: None,
            quiz_id: None,
            exercise_id: Some(exercise_id.clone()),
        },
    )
    .await
    .unwrap();

    let response = app
        .clone()
        .oneshot(request(
            "DELETE",
            &format!("/exercises/{exercise_id}"),
            instructor,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Detached again, the exercise can be updated and deleted.
    db::content::delete_class(&pool, &class.id).await.unwrap();

    let response = app
        .clone()
        .oneshot(request(
            "PUT",
            &format!("/exercises/{exercise_id}"),
            instructor,
            Some(serde_json::json!({ "instrucciones": "Versión corregida" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["instrucciones"], "Versión corregida");

    let response = app
        .clone()
        .oneshot(request(
            "DELETE",
            &format!("/exercises/{exercise_id}"),
            instructor,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(request(
            "GET",
            &format!("/exercises/{exercise_id}"),
            instructor,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_user_creation_conflicts_on_duplicate_email() {
    let (app, _pool) = setup_app().await;
    let admin = Some(("admin-1", "super-admin"));

    let body = serde_json::json!({
        "email": "ana@example.com",
        "nombre_completo": "Ana Gómez",
    });

    let response = app
        .clone()
        .oneshot(request("POST", "/users", admin, Some(body.clone())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .oneshot(request("POST", "/users", admin, Some(body)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}
