use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::Course;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: String,
    pub assignment_name: String,
    pub due_date: NaiveDateTime,
    /// Estimated effort in minutes.
    pub estimated_duration: i64,
    #[serde(default)]
    pub checked: bool,
    pub course: Course,
}

impl Assignment {
    /// Calendar day the assignment is due on, time of day dropped.
    pub fn due_day(&self) -> NaiveDate {
        self.due_date.date()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAssignmentRequest {
    pub assignment_name: String,
    pub course_id: String,
    pub due_date: NaiveDateTime,
    pub estimated_duration: i64,
}

impl NewAssignmentRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.assignment_name.trim().is_empty() {
            return Err(AppError::BadRequest("assignment name is required".to_string()));
        }
        if self.course_id.is_empty() {
            return Err(AppError::BadRequest("course is required".to_string()));
        }
        if self.estimated_duration <= 0 {
            return Err(AppError::BadRequest(
                "estimated duration must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
