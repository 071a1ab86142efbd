use actix_web::{web, HttpResponse};

use crate::database::RecordStore;
use crate::models::{
    AssignmentRequest, CreateStudentRequest, MessageResponse, StudentResponse, StudentRoster,
    StudentWithGrade,
};
use crate::services::student_service;
use crate::utils::AppError;

/// GET /api/students - All students plus the head count
#[utoipa::path(
    get,
    path = "/api/students",
    tag = "Students",
    responses(
        (status = 200, description = "All students and the head count", body = StudentRoster),
        (status = 500, description = "Store failure")
    )
)]
pub async fn get_students(db: web::Data<dyn RecordStore>) -> Result<HttpResponse, AppError> {
    let roster = student_service::list_students(db.get_ref()).await?;
    Ok(HttpResponse::Ok().json(roster))
}

/// GET /api/students/{studentId} - One student with the overall grade
#[utoipa::path(
    get,
    path = "/api/students/{studentId}",
    tag = "Students",
    params(("studentId" = String, Path, description = "Student ObjectId")),
    responses(
        (status = 200, description = "Student and overall grade (null without assignments)", body = StudentWithGrade),
        (status = 400, description = "Invalid studentId", body = MessageResponse),
        (status = 404, description = "No student with that ID", body = MessageResponse),
        (status = 500, description = "Store failure")
    )
)]
pub async fn get_single_student(
    path: web::Path<String>,
    db: web::Data<dyn RecordStore>,
) -> Result<HttpResponse, AppError> {
    let student_id = path.into_inner();
    let found = student_service::get_student(db.get_ref(), &student_id).await?;
    Ok(HttpResponse::Ok().json(found))
}

/// POST /api/students - Create a student
#[utoipa::path(
    post,
    path = "/api/students",
    tag = "Students",
    request_body = CreateStudentRequest,
    responses(
        (status = 200, description = "Created student", body = StudentResponse),
        (status = 400, description = "Malformed JSON body", body = MessageResponse),
        (status = 500, description = "Validation or store failure")
    )
)]
pub async fn create_student(
    body: web::Json<CreateStudentRequest>,
    db: web::Data<dyn RecordStore>,
) -> Result<HttpResponse, AppError> {
    let created = student_service::create_student(db.get_ref(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(created))
}

/// DELETE /api/students/{studentId} - Delete a student and detach them from their course
#[utoipa::path(
    delete,
    path = "/api/students/{studentId}",
    tag = "Students",
    params(("studentId" = String, Path, description = "Student ObjectId")),
    responses(
        (status = 200, description = "Student deleted (with or without a course to detach from)", body = MessageResponse),
        (status = 400, description = "Invalid studentId", body = MessageResponse),
        (status = 404, description = "No such student exists", body = MessageResponse),
        (status = 500, description = "Store failure")
    )
)]
pub async fn delete_student(
    path: web::Path<String>,
    db: web::Data<dyn RecordStore>,
) -> Result<HttpResponse, AppError> {
    let student_id = path.into_inner();
    let message = student_service::delete_student(db.get_ref(), &student_id).await?;
    Ok(HttpResponse::Ok().json(message))
}

/// POST /api/students/{studentId}/assignments - Add an assignment unless an equal one exists
#[utoipa::path(
    post,
    path = "/api/students/{studentId}/assignments",
    tag = "Students",
    params(("studentId" = String, Path, description = "Student ObjectId")),
    request_body = AssignmentRequest,
    responses(
        (status = 200, description = "Updated student", body = StudentResponse),
        (status = 400, description = "Invalid studentId", body = MessageResponse),
        (status = 404, description = "No student found with that ID", body = MessageResponse),
        (status = 500, description = "Validation or store failure")
    )
)]
pub async fn add_assignment(
    path: web::Path<String>,
    body: web::Json<AssignmentRequest>,
    db: web::Data<dyn RecordStore>,
) -> Result<HttpResponse, AppError> {
    let student_id = path.into_inner();
    let updated = student_service::add_assignment(db.get_ref(), &student_id, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(updated))
}

/// DELETE /api/students/{studentId}/assignments/{assignmentId} - Remove matching assignments
#[utoipa::path(
    delete,
    path = "/api/students/{studentId}/assignments/{assignmentId}",
    tag = "Students",
    params(
        ("studentId" = String, Path, description = "Student ObjectId"),
        ("assignmentId" = String, Path, description = "Assignment identifier")
    ),
    responses(
        (status = 200, description = "Updated student (unchanged if nothing matched)", body = StudentResponse),
        (status = 400, description = "Invalid studentId", body = MessageResponse),
        (status = 404, description = "No student found with that ID", body = MessageResponse),
        (status = 500, description = "Store failure")
    )
)]
pub async fn remove_assignment(
    path: web::Path<(String, String)>,
    db: web::Data<dyn RecordStore>,
) -> Result<HttpResponse, AppError> {
    let (student_id, assignment_id) = path.into_inner();
    let updated = student_service::remove_assignment(db.get_ref(), &student_id, &assignment_id).await?;
    Ok(HttpResponse::Ok().json(updated))
}

#[cfg(test)]
mod tests {
    use crate::api::routes;
    use crate::database::{MemoryStore, RecordStore};
    use actix_web::{test, web, App};
    use serde_json::{json, Value};
    use std::sync::Arc;

    fn store() -> web::Data<dyn RecordStore> {
        web::Data::from(Arc::new(MemoryStore::new()) as Arc<dyn RecordStore>)
    }

    fn ada() -> Value {
        json!({ "first": "Ada", "last": "Lovelace", "github": "ada" })
    }

    #[actix_web::test]
    async fn test_student_lifecycle_over_http() {
        let app = test::init_service(App::new().app_data(store()).configure(routes)).await;

        let req = test::TestRequest::post().uri("/api/students").set_json(ada()).to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;
        let id = created["_id"].as_str().unwrap().to_string();
        assert_eq!(created["first"], "Ada");
        assert_eq!(created["assignments"], json!([]));

        for (aid, grade) in [("a", 80), ("b", 100)] {
            let req = test::TestRequest::post()
                .uri(&format!("/api/students/{}/assignments", id))
                .set_json(json!({ "assignmentId": aid, "assignmentName": "Homework", "grade": grade }))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), 200);
        }

        let req = test::TestRequest::get().uri(&format!("/api/students/{}", id)).to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["grade"], json!(90.0));
        assert_eq!(body["student"]["assignments"].as_array().unwrap().len(), 2);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/students/{}/assignments/a", id))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["assignments"].as_array().unwrap().len(), 1);

        let req = test::TestRequest::get().uri("/api/students").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["headCount"], 1);
        assert_eq!(body["students"][0]["_id"], id.as_str());
    }

    #[actix_web::test]
    async fn test_grade_is_null_without_assignments() {
        let app = test::init_service(App::new().app_data(store()).configure(routes)).await;

        let req = test::TestRequest::post().uri("/api/students").set_json(ada()).to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;

        let req = test::TestRequest::get()
            .uri(&format!("/api/students/{}", created["_id"].as_str().unwrap()))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["grade"], Value::Null);
    }

    #[actix_web::test]
    async fn test_empty_roster_has_zero_head_count() {
        let app = test::init_service(App::new().app_data(store()).configure(routes)).await;

        let req = test::TestRequest::get().uri("/api/students").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({ "students": [], "headCount": 0 }));
    }

    #[actix_web::test]
    async fn test_invalid_student_id_is_bad_request() {
        let app = test::init_service(App::new().app_data(store()).configure(routes)).await;

        let req = test::TestRequest::get().uri("/api/students/not-an-id").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "message": "Invalid studentId" }));

        let req = test::TestRequest::delete().uri("/api/students/not-an-id").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
    }

    #[actix_web::test]
    async fn test_unknown_student_is_not_found() {
        let app = test::init_service(App::new().app_data(store()).configure(routes)).await;
        let missing = mongodb::bson::oid::ObjectId::new().to_hex();

        let req = test::TestRequest::get().uri(&format!("/api/students/{}", missing)).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "No student with that ID");

        let req = test::TestRequest::delete().uri(&format!("/api/students/{}", missing)).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "No such student exists");
    }

    #[actix_web::test]
    async fn test_delete_without_course_returns_ok() {
        let app = test::init_service(App::new().app_data(store()).configure(routes)).await;

        let req = test::TestRequest::post().uri("/api/students").set_json(ada()).to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;

        let req = test::TestRequest::delete()
            .uri(&format!("/api/students/{}", created["_id"].as_str().unwrap()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Student deleted, but no courses found");
    }

    #[actix_web::test]
    async fn test_validation_failure_is_server_error() {
        let app = test::init_service(App::new().app_data(store()).configure(routes)).await;

        let req = test::TestRequest::post()
            .uri("/api/students")
            .set_json(json!({ "first": "", "last": "Lovelace", "github": "ada" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 500);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["name"], "ValidationError");
    }

    #[actix_web::test]
    async fn test_schema_mismatch_is_validation_error() {
        let app = test::init_service(App::new().app_data(store()).configure(routes)).await;

        let req = test::TestRequest::post().uri("/api/students").set_json(ada()).to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;
        let id = created["_id"].as_str().unwrap().to_string();

        let cases = [
            ("/api/students".to_string(), json!({ "last": "Lovelace", "github": "ada" })),
            ("/api/students".to_string(), json!({ "first": 42, "last": "Lovelace", "github": "ada" })),
            (format!("/api/students/{}/assignments", id), json!({ "assignmentId": "a", "grade": "ninety" })),
            (format!("/api/students/{}/assignments", id), json!({ "assignmentId": "a" })),
        ];

        for (uri, body) in cases {
            let req = test::TestRequest::post().uri(&uri).set_json(&body).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), 500, "body {}", body);
            let err: Value = test::read_body_json(resp).await;
            assert_eq!(err["name"], "ValidationError");
        }
    }

    #[actix_web::test]
    async fn test_remove_unknown_assignment_returns_unchanged_student() {
        let app = test::init_service(App::new().app_data(store()).configure(routes)).await;

        let req = test::TestRequest::post().uri("/api/students").set_json(ada()).to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;
        let id = created["_id"].as_str().unwrap().to_string();

        let req = test::TestRequest::post()
            .uri(&format!("/api/students/{}/assignments", id))
            .set_json(json!({ "assignmentId": "a", "assignmentName": "Homework", "grade": 80 }))
            .to_request();
        let before: Value = test::call_and_read_body_json(&app, req).await;

        let req = test::TestRequest::delete()
            .uri(&format!("/api/students/{}/assignments/zzz", id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
        let after: Value = test::read_body_json(resp).await;
        assert_eq!(after, before);
    }

    #[actix_web::test]
    async fn test_malformed_json_is_bad_request() {
        let app = test::init_service(App::new().app_data(store()).configure(routes)).await;

        let req = test::TestRequest::post()
            .uri("/api/students")
            .insert_header(("content-type", "application/json"))
            .set_payload("{\"first\": ")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["message"].is_string());
    }
}
