pub mod courses;
pub mod health;
pub mod metrics;
pub mod students;
pub mod swagger;

use actix_web::{
    error::{InternalError, JsonPayloadError},
    web, HttpResponse,
};

use crate::utils::AppError;

/// Well-formed JSON that doesn't fit the schema (missing field, wrong type) is a
/// validation failure like any other; unparseable bodies get a 400 `{ "message": ... }`
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| match err {
        JsonPayloadError::Deserialize(e) if e.is_data() => AppError::validation(e.to_string()).into(),
        err => {
            let message = err.to_string();
            InternalError::from_response(err, HttpResponse::BadRequest().json(serde_json::json!({ "message": message }))).into()
        }
    })
}

/// Registers every route; the store is provided by the caller as `web::Data<dyn RecordStore>`
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        // Health check
        .route("/health", web::get().to(health::health_check))
        // Metrics
        .route("/metrics", web::get().to(metrics::get_metrics))
        .service(
            web::scope("/api/students")
                .route("", web::get().to(students::get_students))
                .route("", web::post().to(students::create_student))
                .route("/{studentId}", web::get().to(students::get_single_student))
                .route("/{studentId}", web::delete().to(students::delete_student))
                .route("/{studentId}/assignments", web::post().to(students::add_assignment))
                .route("/{studentId}/assignments/{assignmentId}", web::delete().to(students::remove_assignment))
        )
        .service(
            web::scope("/api/courses")
                .route("", web::get().to(courses::get_courses))
                .route("", web::post().to(courses::create_course))
                .route("/{courseId}", web::get().to(courses::get_single_course))
                .route("/{courseId}", web::put().to(courses::update_course))
                .route("/{courseId}", web::delete().to(courses::delete_course))
        );
}
