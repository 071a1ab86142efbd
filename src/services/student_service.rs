use mongodb::bson::oid::ObjectId;

use crate::database::RecordStore;
use crate::models::{
    AssignmentRequest, CreateStudentRequest, MessageResponse, StudentResponse, StudentRoster,
    StudentWithGrade,
};
use crate::utils::AppError;

pub const INVALID_STUDENT_ID: &str = "Invalid studentId";
pub const STUDENT_NOT_FOUND: &str = "No student with that ID";
pub const NO_SUCH_STUDENT: &str = "No student found with that ID";
pub const DELETE_NO_SUCH_STUDENT: &str = "No such student exists";
pub const DELETED: &str = "Student successfully deleted";
pub const DELETED_WITHOUT_COURSE: &str = "Student deleted, but no courses found";

/// Rejects malformed ids before any store access
pub fn parse_student_id(raw: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(raw).map_err(|_| AppError::invalid(INVALID_STUDENT_ID))
}

pub async fn list_students(store: &dyn RecordStore) -> Result<StudentRoster, AppError> {
    let students = store.list_students().await?;
    let head_count = store.count_students().await?;

    Ok(StudentRoster {
        students: students.into_iter().map(StudentResponse::from).collect(),
        head_count,
    })
}

pub async fn get_student(store: &dyn RecordStore, student_id: &str) -> Result<StudentWithGrade, AppError> {
    let id = parse_student_id(student_id)?;

    let student = store
        .find_student(id)
        .await?
        .ok_or_else(|| AppError::not_found(STUDENT_NOT_FOUND))?;

    let grade = store.average_grade(id).await?;

    Ok(StudentWithGrade {
        student: student.into(),
        grade,
    })
}

pub async fn create_student(store: &dyn RecordStore, payload: CreateStudentRequest) -> Result<StudentResponse, AppError> {
    let student = payload.into_student()?;
    let created = store.insert_student(student).await?;
    log::info!("✅ Student created: {}", created.id.map(|id| id.to_hex()).unwrap_or_default());
    Ok(created.into())
}

/// Deletes the student, then pulls them from their course. The two writes are
/// not atomic: a failure in between leaves the course reference dangling.
pub async fn delete_student(store: &dyn RecordStore, student_id: &str) -> Result<MessageResponse, AppError> {
    let id = parse_student_id(student_id)?;

    if store.delete_student(id).await?.is_none() {
        return Err(AppError::not_found(DELETE_NO_SUCH_STUDENT));
    }

    match store.detach_student(id).await? {
        Some(course) => {
            log::info!(
                "🗑️  Student {} deleted and removed from course {}",
                id.to_hex(),
                course.id.map(|c| c.to_hex()).unwrap_or_default()
            );
            Ok(MessageResponse::new(DELETED))
        }
        None => {
            log::info!("🗑️  Student {} deleted (not enrolled in any course)", id.to_hex());
            Ok(MessageResponse::new(DELETED_WITHOUT_COURSE))
        }
    }
}

pub async fn add_assignment(
    store: &dyn RecordStore,
    student_id: &str,
    body: AssignmentRequest,
) -> Result<StudentResponse, AppError> {
    let id = parse_student_id(student_id)?;

    log::info!("📝 Adding an assignment to student {}", student_id);
    log::info!("   body: {:?}", body);

    let assignment = body.into_assignment()?;

    store
        .add_assignment(id, assignment)
        .await?
        .map(StudentResponse::from)
        .ok_or_else(|| AppError::not_found(NO_SUCH_STUDENT))
}

pub async fn remove_assignment(
    store: &dyn RecordStore,
    student_id: &str,
    assignment_id: &str,
) -> Result<StudentResponse, AppError> {
    let id = parse_student_id(student_id)?;

    store
        .remove_assignment(id, assignment_id)
        .await?
        .map(StudentResponse::from)
        .ok_or_else(|| AppError::not_found(NO_SUCH_STUDENT))
}
