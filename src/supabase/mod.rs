pub mod dto;

use std::collections::HashMap;
use std::env;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Assignment, Course, NewAssignmentRequest};

const ASSIGNMENT_SELECT: &str =
    "id,assignment_name,due_date,estimated_duration,course:courses(id,course_number,course_name,course_color)";
const COURSE_SELECT: &str = "id,course_number,course_name,course_color";

#[derive(Clone, Debug)]
pub struct SupabaseConfig {
    pub base_url: String,
    pub anon_key: String,
    pub access_token: Option<String>,
}

impl SupabaseConfig {
    pub fn new_from_env() -> Result<Self, AppError> {
        let base_url = env::var("SUPABASE_URL")
            .map_err(|_| AppError::BadRequest("SUPABASE_URL is not set".to_string()))?;
        let anon_key = env::var("SUPABASE_ANON_KEY")
            .map_err(|_| AppError::BadRequest("SUPABASE_ANON_KEY is not set".to_string()))?;
        let access_token = env::var("SUPABASE_ACCESS_TOKEN").ok();

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key,
            access_token,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: Option<String>,
}

#[async_trait]
pub trait SupabaseClient: Send + Sync {
    async fn current_user(&self) -> Result<Option<User>, AppError>;
    async fn fetch_assignments(&self, user: &User) -> Result<Vec<Assignment>, AppError>;
    async fn fetch_user_courses(&self, user: &User) -> Result<Vec<Course>, AppError>;
    async fn fetch_courses(&self) -> Result<Vec<Course>, AppError>;
    async fn create_assignment(&self, req: &NewAssignmentRequest) -> Result<Assignment, AppError>;
    async fn set_assignment_checked(
        &self,
        user: &User,
        assignment_id: &str,
        checked: bool,
    ) -> Result<(), AppError>;
    async fn save_course_selection(&self, user: &User, course_ids: &[String])
    -> Result<(), AppError>;
}

pub struct SupabaseHttpClient {
    client: Client,
    config: SupabaseConfig,
}

impl SupabaseHttpClient {
    pub fn new(config: SupabaseConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .build()
            .map_err(|e| AppError::BadRequest(format!("Failed to build http client: {e}")))?;
        Ok(Self { client, config })
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.config.base_url, table)
    }

    fn bearer(&self) -> &str {
        self.config
            .access_token
            .as_deref()
            .unwrap_or(&self.config.anon_key)
    }

    async fn get_rows<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, AppError> {
        let response = self
            .client
            .get(self.rest_url(table))
            .query(query)
            .header("apikey", &self.config.anon_key)
            .header("Authorization", format!("Bearer {}", self.bearer()))
            .send()
            .await
            .map_err(|e| AppError::FetchFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::FetchFailed(format!(
                "{table} query returned {status}: {body}"
            )));
        }

        response
            .json::<Vec<T>>()
            .await
            .map_err(|e| AppError::FetchFailed(format!("Failed to parse {table} response: {e}")))
    }

    async fn insert_rows<B: Serialize + Sync>(
        &self,
        table: &str,
        query: &[(&str, String)],
        prefer: &str,
        body: &B,
    ) -> Result<reqwest::Response, AppError> {
        let response = self
            .client
            .post(self.rest_url(table))
            .query(query)
            .header("apikey", &self.config.anon_key)
            .header("Authorization", format!("Bearer {}", self.bearer()))
            .header("Prefer", prefer)
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::WriteFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::WriteFailed(format!(
                "{table} insert returned {status}: {body}"
            )));
        }

        Ok(response)
    }
}

#[async_trait]
impl SupabaseClient for SupabaseHttpClient {
    async fn current_user(&self) -> Result<Option<User>, AppError> {
        let Some(token) = self.config.access_token.as_deref() else {
            return Ok(None);
        };

        let response = self
            .client
            .get(format!("{}/auth/v1/user", self.config.base_url))
            .header("apikey", &self.config.anon_key)
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .map_err(|e| AppError::FetchFailed(e.to_string()))?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Ok(None);
        }
        if !response.status().is_success() {
            let status = response.status();
            return Err(AppError::FetchFailed(format!("auth lookup returned {status}")));
        }

        let auth_user = response
            .json::<dto::AuthUserResponse>()
            .await
            .map_err(|e| AppError::FetchFailed(format!("Failed to parse auth response: {e}")))?;
        Ok(Some(User {
            id: auth_user.id,
            email: auth_user.email,
        }))
    }

    async fn fetch_assignments(&self, user: &User) -> Result<Vec<Assignment>, AppError> {
        let rows: Vec<dto::AssignmentRow> = self
            .get_rows(
                "assignments",
                &[
                    ("select", ASSIGNMENT_SELECT.to_string()),
                    ("order", "due_date.asc".to_string()),
                ],
            )
            .await?;

        let checked_rows: Vec<dto::CheckedRow> = self
            .get_rows(
                "user_assignments",
                &[
                    ("select", "assignment_id,checked".to_string()),
                    ("user_id", format!("eq.{}", user.id)),
                ],
            )
            .await?;
        let checked_by_assignment: HashMap<String, bool> = checked_rows
            .into_iter()
            .map(|row| (row.assignment_id, row.checked))
            .collect();

        let mut assignments = Vec::with_capacity(rows.len());
        for row in rows {
            if row.course.is_none() {
                warn!("assignment {} has no resolvable course, using fallback", row.id);
            }
            assignments.push(row.into_assignment(&checked_by_assignment)?);
        }
        Ok(assignments)
    }

    async fn fetch_user_courses(&self, user: &User) -> Result<Vec<Course>, AppError> {
        let rows: Vec<dto::UserCourseRow> = self
            .get_rows(
                "user_courses",
                &[
                    ("select", format!("course:courses({COURSE_SELECT})")),
                    ("user_id", format!("eq.{}", user.id)),
                ],
            )
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|row| row.course.map(Course::from))
            .collect())
    }

    async fn fetch_courses(&self) -> Result<Vec<Course>, AppError> {
        let rows: Vec<dto::CourseRow> = self
            .get_rows(
                "courses",
                &[
                    ("select", COURSE_SELECT.to_string()),
                    ("order", "course_number.asc".to_string()),
                ],
            )
            .await?;
        Ok(rows.into_iter().map(Course::from).collect())
    }

    async fn create_assignment(&self, req: &NewAssignmentRequest) -> Result<Assignment, AppError> {
        req.validate()?;

        let body = dto::NewAssignmentRow {
            assignment_name: &req.assignment_name,
            course_id: &req.course_id,
            due_date: req.due_date.format("%Y-%m-%dT%H:%M:%S").to_string(),
            estimated_duration: req.estimated_duration,
        };

        let response = self
            .insert_rows(
                "assignments",
                &[("select", ASSIGNMENT_SELECT.to_string())],
                "return=representation",
                &body,
            )
            .await?;

        let mut rows = response
            .json::<Vec<dto::AssignmentRow>>()
            .await
            .map_err(|e| AppError::WriteFailed(format!("Failed to parse created assignment: {e}")))?;
        if rows.is_empty() {
            return Err(AppError::WriteFailed(
                "assignment insert returned no rows".to_string(),
            ));
        }
        rows.remove(0).into_assignment(&HashMap::new())
    }

    async fn set_assignment_checked(
        &self,
        user: &User,
        assignment_id: &str,
        checked: bool,
    ) -> Result<(), AppError> {
        let body = dto::CheckedUpsert {
            user_id: &user.id,
            assignment_id,
            checked,
        };

        self.insert_rows(
            "user_assignments",
            &[("on_conflict", "user_id,assignment_id".to_string())],
            "resolution=merge-duplicates,return=minimal",
            &body,
        )
        .await?;
        Ok(())
    }

    async fn save_course_selection(
        &self,
        user: &User,
        course_ids: &[String],
    ) -> Result<(), AppError> {
        if course_ids.is_empty() {
            return Err(AppError::BadRequest(
                "at least one course must be selected".to_string(),
            ));
        }

        let entries: Vec<dto::UserCourseInsert> = course_ids
            .iter()
            .map(|course_id| dto::UserCourseInsert {
                user_id: &user.id,
                course_id,
            })
            .collect();

        self.insert_rows("user_courses", &[], "return=minimal", &entries)
            .await?;
        Ok(())
    }
}

/// Client that answers every call with an empty result. Useful as a
/// stand-in where no backend is configured.
pub struct NoopSupabaseClient;

#[async_trait]
impl SupabaseClient for NoopSupabaseClient {
    async fn current_user(&self) -> Result<Option<User>, AppError> {
        Ok(None)
    }

    async fn fetch_assignments(&self, _user: &User) -> Result<Vec<Assignment>, AppError> {
        Ok(Vec::new())
    }

    async fn fetch_user_courses(&self, _user: &User) -> Result<Vec<Course>, AppError> {
        Ok(Vec::new())
    }

    async fn fetch_courses(&self) -> Result<Vec<Course>, AppError> {
        Ok(Vec::new())
    }

    async fn create_assignment(&self, req: &NewAssignmentRequest) -> Result<Assignment, AppError> {
        req.validate()?;
        Ok(Assignment {
            id: Uuid::new_v4().to_string(),
            assignment_name: req.assignment_name.clone(),
            due_date: req.due_date,
            estimated_duration: req.estimated_duration,
            checked: false,
            course: Course::fallback(),
        })
    }

    async fn set_assignment_checked(
        &self,
        _user: &User,
        _assignment_id: &str,
        _checked: bool,
    ) -> Result<(), AppError> {
        Ok(())
    }

    async fn save_course_selection(
        &self,
        _user: &User,
        _course_ids: &[String],
    ) -> Result<(), AppError> {
        Ok(())
    }
}
