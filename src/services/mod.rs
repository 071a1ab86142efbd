pub mod course_service;
pub mod student_service;
