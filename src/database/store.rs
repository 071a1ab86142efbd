use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::models::{Assignment, Course, CourseChanges, Student};
use crate::utils::AppError;

pub const STUDENTS: &str = "students";
pub const COURSES: &str = "courses";

/// Persistence seam for the handlers. Each method is one store round trip;
/// multi-step operations are composed by the services and are not atomic.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn ping(&self) -> Result<(), AppError>;

    async fn list_students(&self) -> Result<Vec<Student>, AppError>;

    /// Number of student documents, 0 when the collection is empty
    async fn count_students(&self) -> Result<u64, AppError>;

    async fn find_student(&self, id: ObjectId) -> Result<Option<Student>, AppError>;

    /// Mean of all assignment grades; `None` when the student has no
    /// assignments or does not exist
    async fn average_grade(&self, id: ObjectId) -> Result<Option<f64>, AppError>;

    /// Inserts and returns the document with its generated id
    async fn insert_student(&self, student: Student) -> Result<Student, AppError>;

    async fn delete_student(&self, id: ObjectId) -> Result<Option<Student>, AppError>;

    async fn delete_students(&self, ids: &[ObjectId]) -> Result<u64, AppError>;

    /// Appends unless an equal assignment is already present
    async fn add_assignment(&self, id: ObjectId, assignment: Assignment) -> Result<Option<Student>, AppError>;

    async fn remove_assignment(&self, id: ObjectId, assignment_id: &str) -> Result<Option<Student>, AppError>;

    async fn list_courses(&self) -> Result<Vec<Course>, AppError>;

    async fn find_course(&self, id: ObjectId) -> Result<Option<Course>, AppError>;

    async fn insert_course(&self, course: Course) -> Result<Course, AppError>;

    async fn update_course(&self, id: ObjectId, changes: CourseChanges) -> Result<Option<Course>, AppError>;

    async fn delete_course(&self, id: ObjectId) -> Result<Option<Course>, AppError>;

    /// Pulls the student from the first course that lists them
    async fn detach_student(&self, student_id: ObjectId) -> Result<Option<Course>, AppError>;
}
