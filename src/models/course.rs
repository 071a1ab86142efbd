use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::utils::AppError;

/// Default course length when `endDate` is omitted
pub const DEFAULT_COURSE_LENGTH_SECS: i64 = 12 * 7 * 24 * 60 * 60;

/// Course stored in the `courses` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub course_name: String,
    pub in_person: bool,
    pub start_date: i64,
    pub end_date: i64,
    #[serde(default)]
    pub students: Vec<ObjectId>,
}

impl Course {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.course_name.trim().is_empty() {
            return Err(AppError::validation("courseName is required"));
        }
        if self.end_date < self.start_date {
            return Err(AppError::validation("endDate must not precede startDate"));
        }
        Ok(())
    }
}

/// Partial update applied with `$set`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CourseChanges {
    pub course_name: Option<String>,
    pub in_person: Option<bool>,
    pub start_date: Option<i64>,
    pub end_date: Option<i64>,
    pub students: Option<Vec<ObjectId>>,
}

impl CourseChanges {
    pub fn apply_to(&self, course: &mut Course) {
        if let Some(name) = &self.course_name { course.course_name = name.clone(); }
        if let Some(in_person) = self.in_person { course.in_person = in_person; }
        if let Some(start) = self.start_date { course.start_date = start; }
        if let Some(end) = self.end_date { course.end_date = end; }
        if let Some(students) = &self.students { course.students = students.clone(); }
    }
}

fn parse_student_ids(ids: Vec<String>) -> Result<Vec<ObjectId>, AppError> {
    let mut parsed: Vec<ObjectId> = Vec::with_capacity(ids.len());
    for raw in ids {
        let id = ObjectId::parse_str(&raw).map_err(|_| AppError::invalid("Invalid studentId"))?;
        if !parsed.contains(&id) {
            parsed.push(id);
        }
    }
    Ok(parsed)
}

/// Body for POST /api/courses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseRequest {
    pub course_name: String,
    pub in_person: Option<bool>,
    pub start_date: Option<i64>,
    pub end_date: Option<i64>,
    #[serde(default)]
    pub students: Vec<String>,
}

impl CreateCourseRequest {
    pub fn into_course(self, now: i64) -> Result<Course, AppError> {
        let start_date = self.start_date.unwrap_or(now);
        let course = Course {
            id: None,
            course_name: self.course_name,
            in_person: self.in_person.unwrap_or(true),
            start_date,
            end_date: self.end_date.unwrap_or(start_date + DEFAULT_COURSE_LENGTH_SECS),
            students: parse_student_ids(self.students)?,
        };
        course.validate()?;
        Ok(course)
    }
}

/// Body for PUT /api/courses/{courseId}
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCourseRequest {
    pub course_name: Option<String>,
    pub in_person: Option<bool>,
    pub start_date: Option<i64>,
    pub end_date: Option<i64>,
    pub students: Option<Vec<String>>,
}

impl UpdateCourseRequest {
    pub fn into_changes(self) -> Result<CourseChanges, AppError> {
        if let Some(name) = &self.course_name {
            if name.trim().is_empty() {
                return Err(AppError::validation("courseName is required"));
            }
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if end < start {
                return Err(AppError::validation("endDate must not precede startDate"));
            }
        }

        Ok(CourseChanges {
            course_name: self.course_name,
            in_person: self.in_person,
            start_date: self.start_date,
            end_date: self.end_date,
            students: self.students.map(parse_student_ids).transpose()?,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub course_name: String,
    pub in_person: bool,
    pub start_date: i64,
    pub end_date: i64,
    pub students: Vec<String>,
}

impl From<Course> for CourseResponse {
    fn from(c: Course) -> Self {
        CourseResponse {
            id: c.id.map(|id| id.to_hex()).unwrap_or_default(),
            course_name: c.course_name,
            in_person: c.in_person,
            start_date: c.start_date,
            end_date: c.end_date,
            students: c.students.iter().map(|id| id.to_hex()).collect(),
        }
    }
}
