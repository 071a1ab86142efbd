use mongodb::bson::oid::ObjectId;

use crate::database::RecordStore;
use crate::models::{CourseResponse, CreateCourseRequest, MessageResponse, UpdateCourseRequest};
use crate::utils::AppError;

pub const INVALID_COURSE_ID: &str = "Invalid courseId";
pub const COURSE_NOT_FOUND: &str = "No course with that ID";
pub const UPDATE_NOT_FOUND: &str = "No course with this id!";
pub const COURSE_DELETED: &str = "Course and students deleted!";

pub fn parse_course_id(raw: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(raw).map_err(|_| AppError::invalid(INVALID_COURSE_ID))
}

pub async fn list_courses(store: &dyn RecordStore) -> Result<Vec<CourseResponse>, AppError> {
    let courses = store.list_courses().await?;
    Ok(courses.into_iter().map(CourseResponse::from).collect())
}

pub async fn get_course(store: &dyn RecordStore, course_id: &str) -> Result<CourseResponse, AppError> {
    let id = parse_course_id(course_id)?;

    store
        .find_course(id)
        .await?
        .map(CourseResponse::from)
        .ok_or_else(|| AppError::not_found(COURSE_NOT_FOUND))
}

pub async fn create_course(store: &dyn RecordStore, payload: CreateCourseRequest) -> Result<CourseResponse, AppError> {
    let course = payload.into_course(chrono::Utc::now().timestamp())?;
    let created = store.insert_course(course).await?;
    Ok(created.into())
}

pub async fn update_course(
    store: &dyn RecordStore,
    course_id: &str,
    payload: UpdateCourseRequest,
) -> Result<CourseResponse, AppError> {
    let id = parse_course_id(course_id)?;
    let changes = payload.into_changes()?;

    store
        .update_course(id, changes)
        .await?
        .map(CourseResponse::from)
        .ok_or_else(|| AppError::not_found(UPDATE_NOT_FOUND))
}

/// Deletes the course and every student enrolled in it. Not atomic.
pub async fn delete_course(store: &dyn RecordStore, course_id: &str) -> Result<MessageResponse, AppError> {
    let id = parse_course_id(course_id)?;

    let course = store
        .delete_course(id)
        .await?
        .ok_or_else(|| AppError::not_found(COURSE_NOT_FOUND))?;

    let removed = store.delete_students(&course.students).await?;
    log::info!("🗑️  Course {} deleted with {} student(s)", id.to_hex(), removed);

    Ok(MessageResponse::new(COURSE_DELETED))
}
