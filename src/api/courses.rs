use actix_web::{web, HttpResponse};

use crate::database::RecordStore;
use crate::models::{CourseResponse, CreateCourseRequest, MessageResponse, UpdateCourseRequest};
use crate::services::course_service;
use crate::utils::AppError;

#[utoipa::path(
    get,
    path = "/api/courses",
    tag = "Courses",
    responses(
        (status = 200, description = "All courses", body = [CourseResponse]),
        (status = 500, description = "Store failure")
    )
)]
pub async fn get_courses(db: web::Data<dyn RecordStore>) -> Result<HttpResponse, AppError> {
    let courses = course_service::list_courses(db.get_ref()).await?;
    Ok(HttpResponse::Ok().json(courses))
}

#[utoipa::path(
    get,
    path = "/api/courses/{courseId}",
    tag = "Courses",
    params(("courseId" = String, Path, description = "Course ObjectId")),
    responses(
        (status = 200, description = "Course", body = CourseResponse),
        (status = 400, description = "Invalid courseId", body = MessageResponse),
        (status = 404, description = "No course with that ID", body = MessageResponse)
    )
)]
pub async fn get_single_course(
    path: web::Path<String>,
    db: web::Data<dyn RecordStore>,
) -> Result<HttpResponse, AppError> {
    let course = course_service::get_course(db.get_ref(), &path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(course))
}

#[utoipa::path(
    post,
    path = "/api/courses",
    tag = "Courses",
    request_body = CreateCourseRequest,
    responses(
        (status = 200, description = "Created course", body = CourseResponse),
        (status = 400, description = "Malformed body or student id", body = MessageResponse),
        (status = 500, description = "Validation or store failure")
    )
)]
pub async fn create_course(
    body: web::Json<CreateCourseRequest>,
    db: web::Data<dyn RecordStore>,
) -> Result<HttpResponse, AppError> {
    let created = course_service::create_course(db.get_ref(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(created))
}

#[utoipa::path(
    put,
    path = "/api/courses/{courseId}",
    tag = "Courses",
    params(("courseId" = String, Path, description = "Course ObjectId")),
    request_body = UpdateCourseRequest,
    responses(
        (status = 200, description = "Updated course", body = CourseResponse),
        (status = 400, description = "Invalid courseId", body = MessageResponse),
        (status = 404, description = "No course with this id!", body = MessageResponse),
        (status = 500, description = "Validation or store failure")
    )
)]
pub async fn update_course(
    path: web::Path<String>,
    body: web::Json<UpdateCourseRequest>,
    db: web::Data<dyn RecordStore>,
) -> Result<HttpResponse, AppError> {
    let updated = course_service::update_course(db.get_ref(), &path.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(updated))
}

#[utoipa::path(
    delete,
    path = "/api/courses/{courseId}",
    tag = "Courses",
    params(("courseId" = String, Path, description = "Course ObjectId")),
    responses(
        (status = 200, description = "Course and its students deleted", body = MessageResponse),
        (status = 400, description = "Invalid courseId", body = MessageResponse),
        (status = 404, description = "No course with that ID", body = MessageResponse)
    )
)]
pub async fn delete_course(
    path: web::Path<String>,
    db: web::Data<dyn RecordStore>,
) -> Result<HttpResponse, AppError> {
    let message = course_service::delete_course(db.get_ref(), &path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(message))
}

#[cfg(test)]
mod tests {
    use crate::api::routes;
    use crate::database::{MemoryStore, RecordStore};
    use actix_web::{test, web, App};
    use serde_json::{json, Value};
    use std::sync::Arc;

    #[actix_web::test]
    async fn test_enrol_then_delete_student_detaches() {
        let store: web::Data<dyn RecordStore> =
            web::Data::from(Arc::new(MemoryStore::new()) as Arc<dyn RecordStore>);
        let app = test::init_service(App::new().app_data(store).configure(routes)).await;

        let req = test::TestRequest::post()
            .uri("/api/students")
            .set_json(json!({ "first": "Alan", "last": "Turing", "github": "aturing" }))
            .to_request();
        let student: Value = test::call_and_read_body_json(&app, req).await;
        let sid = student["_id"].as_str().unwrap().to_string();

        let req = test::TestRequest::post()
            .uri("/api/courses")
            .set_json(json!({ "courseName": "Computability", "students": [sid] }))
            .to_request();
        let course: Value = test::call_and_read_body_json(&app, req).await;
        let cid = course["_id"].as_str().unwrap().to_string();
        assert_eq!(course["inPerson"], true);

        let req = test::TestRequest::delete().uri(&format!("/api/students/{}", sid)).to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["message"], "Student successfully deleted");

        let req = test::TestRequest::get().uri(&format!("/api/courses/{}", cid)).to_request();
        let course: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(course["students"], json!([]));
    }

    #[actix_web::test]
    async fn test_update_and_delete_course() {
        let store: web::Data<dyn RecordStore> =
            web::Data::from(Arc::new(MemoryStore::new()) as Arc<dyn RecordStore>);
        let app = test::init_service(App::new().app_data(store).configure(routes)).await;

        let req = test::TestRequest::post()
            .uri("/api/courses")
            .set_json(json!({ "courseName": "Networks" }))
            .to_request();
        let course: Value = test::call_and_read_body_json(&app, req).await;
        let cid = course["_id"].as_str().unwrap().to_string();

        let req = test::TestRequest::put()
            .uri(&format!("/api/courses/{}", cid))
            .set_json(json!({ "inPerson": false }))
            .to_request();
        let updated: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(updated["inPerson"], false);
        assert_eq!(updated["courseName"], "Networks");

        let req = test::TestRequest::delete().uri(&format!("/api/courses/{}", cid)).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);

        let req = test::TestRequest::get().uri(&format!("/api/courses/{}", cid)).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);

        let req = test::TestRequest::get().uri("/api/courses/xyz").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
    }
}
