use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::{Assignment, Course};

#[derive(Debug, Deserialize)]
pub struct CourseRow {
    pub id: String,
    pub course_number: String,
    pub course_name: String,
    pub course_color: String,
}

impl From<CourseRow> for Course {
    fn from(row: CourseRow) -> Self {
        Course {
            id: row.id,
            course_number: row.course_number,
            course_name: row.course_name,
            course_color: row.course_color,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AssignmentRow {
    pub id: String,
    pub assignment_name: String,
    pub due_date: String,
    pub estimated_duration: i64,
    pub course: Option<CourseRow>,
}

impl AssignmentRow {
    /// Adapts a row into the in-memory shape. A missing course join gets the
    /// fallback course; the checked flag comes from the per-user map.
    pub fn into_assignment(
        self,
        checked_by_assignment: &HashMap<String, bool>,
    ) -> Result<Assignment, AppError> {
        let due_date = parse_timestamp(&self.due_date)?;
        let checked = checked_by_assignment.get(&self.id).copied().unwrap_or(false);
        let course = match self.course {
            Some(row) => Course::from(row),
            None => Course::fallback(),
        };

        Ok(Assignment {
            id: self.id,
            assignment_name: self.assignment_name,
            due_date,
            estimated_duration: self.estimated_duration,
            checked,
            course,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct UserCourseRow {
    pub course: Option<CourseRow>,
}

#[derive(Debug, Deserialize)]
pub struct CheckedRow {
    pub assignment_id: String,
    pub checked: bool,
}

#[derive(Debug, Serialize)]
pub struct CheckedUpsert<'a> {
    pub user_id: &'a str,
    pub assignment_id: &'a str,
    pub checked: bool,
}

#[derive(Debug, Serialize)]
pub struct UserCourseInsert<'a> {
    pub user_id: &'a str,
    pub course_id: &'a str,
}

#[derive(Debug, Serialize)]
pub struct NewAssignmentRow<'a> {
    pub assignment_name: &'a str,
    pub course_id: &'a str,
    pub due_date: String,
    pub estimated_duration: i64,
}

#[derive(Debug, Deserialize)]
pub struct AuthUserResponse {
    pub id: String,
    pub email: Option<String>,
}

/// Timestamps arrive either as RFC 3339 with an offset or as a bare
/// timestamp column. Either way the wall-clock fields are kept as written.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, AppError> {
    if let Ok(with_offset) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Ok(with_offset.naive_local());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map_err(|e| AppError::FetchFailed(format!("invalid timestamp {raw:?}: {e}")))
}
