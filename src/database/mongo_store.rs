use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Bson, Document};
use mongodb::options::ReturnDocument;
use mongodb::Collection;

use super::store::{RecordStore, COURSES, STUDENTS};
use super::MongoDB;
use crate::models::{Assignment, Course, CourseChanges, Student};
use crate::utils::AppError;

impl MongoDB {
    fn students(&self) -> Collection<Student> {
        self.collection(STUDENTS)
    }

    fn courses(&self) -> Collection<Course> {
        self.collection(COURSES)
    }
}

fn as_count(value: Option<&Bson>) -> u64 {
    match value {
        Some(Bson::Int32(n)) => (*n).max(0) as u64,
        Some(Bson::Int64(n)) => (*n).max(0) as u64,
        Some(Bson::Double(n)) if *n >= 0.0 => *n as u64,
        _ => 0,
    }
}

/// `$avg` yields a double, or null when no grade was numeric
fn as_grade(value: Option<&Bson>) -> Option<f64> {
    match value {
        Some(Bson::Double(avg)) => Some(*avg),
        Some(Bson::Int32(avg)) => Some(f64::from(*avg)),
        Some(Bson::Int64(avg)) => Some(*avg as f64),
        _ => None,
    }
}

fn set_document(changes: &CourseChanges) -> Document {
    let mut set = Document::new();
    if let Some(name) = &changes.course_name { set.insert("courseName", name.clone()); }
    if let Some(in_person) = changes.in_person { set.insert("inPerson", in_person); }
    if let Some(start) = changes.start_date { set.insert("startDate", start); }
    if let Some(end) = changes.end_date { set.insert("endDate", end); }
    if let Some(students) = &changes.students { set.insert("students", students.clone()); }
    set
}

#[async_trait]
impl RecordStore for MongoDB {
    async fn ping(&self) -> Result<(), AppError> {
        self.client().database("admin").run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    async fn list_students(&self) -> Result<Vec<Student>, AppError> {
        let cursor = self.students().find(doc! {}).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn count_students(&self) -> Result<u64, AppError> {
        let pipeline = vec![doc! {
            "$group": { "_id": null, "count": { "$sum": 1 } }
        }];

        let mut cursor = self.students().aggregate(pipeline).await?;
        let bucket = cursor.try_next().await?;

        Ok(bucket.map(|b| as_count(b.get("count"))).unwrap_or(0))
    }

    async fn find_student(&self, id: ObjectId) -> Result<Option<Student>, AppError> {
        Ok(self
            .students()
            .find_one(doc! { "_id": id })
            .projection(doc! { "__v": 0 })
            .await?)
    }

    async fn average_grade(&self, id: ObjectId) -> Result<Option<f64>, AppError> {
        let pipeline = vec![
            doc! { "$match": { "_id": id } },
            doc! { "$unwind": "$assignments" },
            doc! {
                "$group": {
                    "_id": "$_id",
                    "overallGrade": { "$avg": "$assignments.grade" }
                }
            },
        ];

        // No assignments: $unwind emits no rows, so the cursor is empty
        let mut cursor = self.students().aggregate(pipeline).await?;
        let row = cursor.try_next().await?;

        Ok(row.and_then(|r| as_grade(r.get("overallGrade"))))
    }

    async fn insert_student(&self, mut student: Student) -> Result<Student, AppError> {
        let result = self.students().insert_one(&student).await?;
        student.id = result.inserted_id.as_object_id();
        Ok(student)
    }

    async fn delete_student(&self, id: ObjectId) -> Result<Option<Student>, AppError> {
        Ok(self.students().find_one_and_delete(doc! { "_id": id }).await?)
    }

    async fn delete_students(&self, ids: &[ObjectId]) -> Result<u64, AppError> {
        if ids.is_empty() {
            return Ok(0);
        }
        let result = self
            .students()
            .delete_many(doc! { "_id": { "$in": ids.to_vec() } })
            .await?;
        Ok(result.deleted_count)
    }

    async fn add_assignment(&self, id: ObjectId, assignment: Assignment) -> Result<Option<Student>, AppError> {
        let assignment = mongodb::bson::to_bson(&assignment)?;

        Ok(self
            .students()
            .find_one_and_update(
                doc! { "_id": id },
                doc! { "$addToSet": { "assignments": assignment } },
            )
            .return_document(ReturnDocument::After)
            .await?)
    }

    async fn remove_assignment(&self, id: ObjectId, assignment_id: &str) -> Result<Option<Student>, AppError> {
        Ok(self
            .students()
            .find_one_and_update(
                doc! { "_id": id },
                doc! { "$pull": { "assignments": { "assignmentId": assignment_id } } },
            )
            .return_document(ReturnDocument::After)
            .await?)
    }

    async fn list_courses(&self) -> Result<Vec<Course>, AppError> {
        let cursor = self.courses().find(doc! {}).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_course(&self, id: ObjectId) -> Result<Option<Course>, AppError> {
        Ok(self
            .courses()
            .find_one(doc! { "_id": id })
            .projection(doc! { "__v": 0 })
            .await?)
    }

    async fn insert_course(&self, mut course: Course) -> Result<Course, AppError> {
        let result = self.courses().insert_one(&course).await?;
        course.id = result.inserted_id.as_object_id();
        Ok(course)
    }

    async fn update_course(&self, id: ObjectId, changes: CourseChanges) -> Result<Option<Course>, AppError> {
        let set = set_document(&changes);
        if set.is_empty() {
            return self.find_course(id).await;
        }

        Ok(self
            .courses()
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await?)
    }

    async fn delete_course(&self, id: ObjectId) -> Result<Option<Course>, AppError> {
        Ok(self.courses().find_one_and_delete(doc! { "_id": id }).await?)
    }

    async fn detach_student(&self, student_id: ObjectId) -> Result<Option<Course>, AppError> {
        Ok(self
            .courses()
            .find_one_and_update(
                doc! { "students": student_id },
                doc! { "$pull": { "students": student_id } },
            )
            .return_document(ReturnDocument::After)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_handles_numeric_widths() {
        assert_eq!(as_count(Some(&Bson::Int32(3))), 3);
        assert_eq!(as_count(Some(&Bson::Int64(7))), 7);
        assert_eq!(as_count(None), 0);
        assert_eq!(as_count(Some(&Bson::String("3".into()))), 0);
    }

    #[test]
    fn test_grade_decodes_avg_row() {
        let row = doc! { "_id": ObjectId::new(), "overallGrade": 90.0 };
        assert_eq!(as_grade(row.get("overallGrade")), Some(90.0));

        assert_eq!(as_grade(Some(&Bson::Int32(85))), Some(85.0));
        assert_eq!(as_grade(Some(&Bson::Int64(70))), Some(70.0));
        assert_eq!(as_grade(Some(&Bson::Null)), None);
        assert_eq!(as_grade(None), None);
        assert_eq!(as_grade(Some(&Bson::String("90".into()))), None);
    }

    #[test]
    fn test_set_document_only_has_supplied_fields() {
        let set = set_document(&CourseChanges {
            course_name: Some("Algorithms".into()),
            in_person: Some(false),
            ..Default::default()
        });
        assert_eq!(set, doc! { "courseName": "Algorithms", "inPerson": false });
        assert!(set_document(&CourseChanges::default()).is_empty());
    }
}
