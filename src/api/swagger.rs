use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Student Record Service API",
        version = "1.0.0",
        description = "Student and course records over MongoDB.\n\n**Features:**\n- Students with embedded assignments and a computed overall grade\n- Courses holding enrolled student ids\n- Health monitoring and metrics"
    ),
    paths(
        // Students
        crate::api::students::get_students,
        crate::api::students::get_single_student,
        crate::api::students::create_student,
        crate::api::students::delete_student,
        crate::api::students::add_assignment,
        crate::api::students::remove_assignment,

        // Courses
        crate::api::courses::get_courses,
        crate::api::courses::get_single_course,
        crate::api::courses::create_course,
        crate::api::courses::update_course,
        crate::api::courses::delete_course,

        // Health & Metrics
        crate::api::health::health_check,
        crate::api::metrics::get_metrics,
    ),
    components(
        schemas(
            crate::models::Assignment,
            crate::models::AssignmentRequest,
            crate::models::CreateStudentRequest,
            crate::models::StudentResponse,
            crate::models::StudentRoster,
            crate::models::StudentWithGrade,
            crate::models::MessageResponse,
            crate::models::CreateCourseRequest,
            crate::models::UpdateCourseRequest,
            crate::models::CourseResponse,
            crate::api::health::HealthResponse,
        )
    ),
    tags(
        (name = "Students", description = "Student records, assignments and overall grade."),
        (name = "Courses", description = "Courses and their enrolled students."),
        (name = "Health", description = "Health check and system metrics endpoints for monitoring service status."),
    )
)]
pub struct ApiDoc;
