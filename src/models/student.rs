use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::utils::AppError;

pub const DEFAULT_ASSIGNMENT_NAME: &str = "Unnamed assignment";
const ASSIGNMENT_NAME_MIN: usize = 4;
const ASSIGNMENT_NAME_MAX: usize = 50;

/// Student stored in the `students` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub first: String,
    pub last: String,
    pub github: String,
    #[serde(default)]
    pub assignments: Vec<Assignment>,
}

/// Assignment embedded in a student. Equality is by full value, which is what
/// `$addToSet` compares.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub assignment_id: String,
    pub assignment_name: String,
    pub grade: f64,
}

impl Assignment {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.assignment_id.trim().is_empty() {
            return Err(AppError::validation("assignmentId must not be empty"));
        }

        let name_len = self.assignment_name.chars().count();
        if !(ASSIGNMENT_NAME_MIN..=ASSIGNMENT_NAME_MAX).contains(&name_len) {
            return Err(AppError::validation(format!(
                "assignmentName must be between {} and {} characters",
                ASSIGNMENT_NAME_MIN, ASSIGNMENT_NAME_MAX
            )));
        }

        if !self.grade.is_finite() || !(0.0..=100.0).contains(&self.grade) {
            return Err(AppError::validation("grade must be between 0 and 100"));
        }

        Ok(())
    }
}

impl Student {
    pub fn validate(&self) -> Result<(), AppError> {
        for (field, value) in [("first", &self.first), ("last", &self.last), ("github", &self.github)] {
            if value.trim().is_empty() {
                return Err(AppError::validation(format!("{} is required", field)));
            }
        }

        self.assignments.iter().try_for_each(Assignment::validate)
    }
}

/// Body for POST /api/students/{studentId}/assignments
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentRequest {
    /// Generated when omitted
    pub assignment_id: Option<String>,
    pub assignment_name: Option<String>,
    pub grade: f64,
}

impl AssignmentRequest {
    pub fn into_assignment(self) -> Result<Assignment, AppError> {
        let assignment = Assignment {
            assignment_id: self.assignment_id.unwrap_or_else(|| ObjectId::new().to_hex()),
            assignment_name: self
                .assignment_name
                .unwrap_or_else(|| DEFAULT_ASSIGNMENT_NAME.to_string()),
            grade: self.grade,
        };
        assignment.validate()?;
        Ok(assignment)
    }
}

/// Body for POST /api/students
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateStudentRequest {
    pub first: String,
    pub last: String,
    pub github: String,
    #[serde(default)]
    pub assignments: Vec<AssignmentRequest>,
}

impl CreateStudentRequest {
    pub fn into_student(self) -> Result<Student, AppError> {
        let assignments = self
            .assignments
            .into_iter()
            .map(AssignmentRequest::into_assignment)
            .collect::<Result<Vec<_>, _>>()?;

        let student = Student {
            id: None,
            first: self.first,
            last: self.last,
            github: self.github,
            assignments,
        };
        student.validate()?;
        Ok(student)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StudentResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub first: String,
    pub last: String,
    pub github: String,
    pub assignments: Vec<Assignment>,
}

impl From<Student> for StudentResponse {
    fn from(s: Student) -> Self {
        StudentResponse {
            id: s.id.map(|id| id.to_hex()).unwrap_or_default(),
            first: s.first,
            last: s.last,
            github: s.github,
            assignments: s.assignments,
        }
    }
}

/// GET /api/students payload
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StudentRoster {
    pub students: Vec<StudentResponse>,
    #[serde(rename = "headCount")]
    pub head_count: u64,
}

/// GET /api/students/{studentId} payload; `grade` is null without assignments
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StudentWithGrade {
    pub student: StudentResponse,
    pub grade: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        MessageResponse { message: message.into() }
    }
}
