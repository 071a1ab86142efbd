use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

use super::store::RecordStore;
use crate::models::{Assignment, Course, CourseChanges, Student};
use crate::utils::AppError;

/// In-process store used with `STORE_BACKEND=memory` and in tests.
/// Keeps insertion order, like a collection scan without a sort.
#[derive(Default)]
pub struct MemoryStore {
    students: RwLock<Vec<Student>>,
    courses: RwLock<Vec<Course>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn list_students(&self) -> Result<Vec<Student>, AppError> {
        Ok(self.students.read().await.clone())
    }

    async fn count_students(&self) -> Result<u64, AppError> {
        Ok(self.students.read().await.len() as u64)
    }

    async fn find_student(&self, id: ObjectId) -> Result<Option<Student>, AppError> {
        let students = self.students.read().await;
        Ok(students.iter().find(|s| s.id == Some(id)).cloned())
    }

    async fn average_grade(&self, id: ObjectId) -> Result<Option<f64>, AppError> {
        let students = self.students.read().await;
        let Some(student) = students.iter().find(|s| s.id == Some(id)) else {
            return Ok(None);
        };

        if student.assignments.is_empty() {
            return Ok(None);
        }

        let total: f64 = student.assignments.iter().map(|a| a.grade).sum();
        Ok(Some(total / student.assignments.len() as f64))
    }

    async fn insert_student(&self, mut student: Student) -> Result<Student, AppError> {
        let id = student.id.unwrap_or_else(ObjectId::new);
        let mut students = self.students.write().await;
        if students.iter().any(|s| s.id == Some(id)) {
            return Err(AppError::DatabaseError(format!("duplicate key: _id {}", id)));
        }
        student.id = Some(id);
        students.push(student.clone());
        Ok(student)
    }

    async fn delete_student(&self, id: ObjectId) -> Result<Option<Student>, AppError> {
        let mut students = self.students.write().await;
        Ok(students
            .iter()
            .position(|s| s.id == Some(id))
            .map(|idx| students.remove(idx)))
    }

    async fn delete_students(&self, ids: &[ObjectId]) -> Result<u64, AppError> {
        let mut students = self.students.write().await;
        let before = students.len();
        students.retain(|s| !s.id.is_some_and(|id| ids.contains(&id)));
        Ok((before - students.len()) as u64)
    }

    async fn add_assignment(&self, id: ObjectId, assignment: Assignment) -> Result<Option<Student>, AppError> {
        let mut students = self.students.write().await;
        let Some(student) = students.iter_mut().find(|s| s.id == Some(id)) else {
            return Ok(None);
        };

        if !student.assignments.contains(&assignment) {
            student.assignments.push(assignment);
        }
        Ok(Some(student.clone()))
    }

    async fn remove_assignment(&self, id: ObjectId, assignment_id: &str) -> Result<Option<Student>, AppError> {
        let mut students = self.students.write().await;
        let Some(student) = students.iter_mut().find(|s| s.id == Some(id)) else {
            return Ok(None);
        };

        student.assignments.retain(|a| a.assignment_id != assignment_id);
        Ok(Some(student.clone()))
    }

    async fn list_courses(&self) -> Result<Vec<Course>, AppError> {
        Ok(self.courses.read().await.clone())
    }

    async fn find_course(&self, id: ObjectId) -> Result<Option<Course>, AppError> {
        let courses = self.courses.read().await;
        Ok(courses.iter().find(|c| c.id == Some(id)).cloned())
    }

    async fn insert_course(&self, mut course: Course) -> Result<Course, AppError> {
        let id = course.id.unwrap_or_else(ObjectId::new);
        let mut courses = self.courses.write().await;
        if courses.iter().any(|c| c.id == Some(id)) {
            return Err(AppError::DatabaseError(format!("duplicate key: _id {}", id)));
        }
        course.id = Some(id);
        courses.push(course.clone());
        Ok(course)
    }

    async fn update_course(&self, id: ObjectId, changes: CourseChanges) -> Result<Option<Course>, AppError> {
        let mut courses = self.courses.write().await;
        let Some(course) = courses.iter_mut().find(|c| c.id == Some(id)) else {
            return Ok(None);
        };

        changes.apply_to(course);
        Ok(Some(course.clone()))
    }

    async fn delete_course(&self, id: ObjectId) -> Result<Option<Course>, AppError> {
        let mut courses = self.courses.write().await;
        Ok(courses
            .iter()
            .position(|c| c.id == Some(id))
            .map(|idx| courses.remove(idx)))
    }

    async fn detach_student(&self, student_id: ObjectId) -> Result<Option<Course>, AppError> {
        let mut courses = self.courses.write().await;
        let Some(course) = courses.iter_mut().find(|c| c.students.contains(&student_id)) else {
            return Ok(None);
        };

        course.students.retain(|id| *id != student_id);
        Ok(Some(course.clone()))
    }
}
