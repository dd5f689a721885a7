use std::sync::Arc;

use chrono::NaiveDateTime;
use tracing::{info, warn};

use crate::calendar::EventStore;
use crate::error::AppError;
use crate::models::{Assignment, Course, NewAssignmentRequest};
use crate::supabase::{SupabaseClient, User};

/// In-memory agenda state for one signed-in user. All mutation goes through
/// the methods below; callers re-derive the timeline from `assignments()`
/// after each change.
pub struct AgendaService {
    client: Arc<dyn SupabaseClient>,
    user: User,
    assignments: Vec<Assignment>,
    courses: Vec<Course>,
    loading: bool,
    error: Option<String>,
}

impl AgendaService {
    pub fn new(client: Arc<dyn SupabaseClient>, user: User) -> Self {
        Self {
            client,
            user,
            assignments: Vec::new(),
            courses: Vec::new(),
            loading: false,
            error: None,
        }
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    /// Inline error from the last load, if it failed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Fetches assignments and enrolled courses in parallel. On failure the
    /// previously loaded data stays in place and the error is kept for
    /// inline display.
    pub async fn load(&mut self) {
        self.loading = true;
        self.error = None;

        let (assignments, courses) = tokio::join!(
            self.client.fetch_assignments(&self.user),
            self.client.fetch_user_courses(&self.user),
        );

        match (assignments, courses) {
            (Ok(assignments), Ok(courses)) => {
                info!(
                    "loaded {} assignments and {} courses",
                    assignments.len(),
                    courses.len()
                );
                self.assignments = assignments;
                self.courses = courses;
            }
            (Err(err), _) | (_, Err(err)) => {
                warn!("agenda load failed: {err}");
                self.error = Some(format!("Failed to fetch assignments or courses: {err}"));
            }
        }

        self.loading = false;
    }

    /// Optimistically toggles the checked flag: the local copy flips before
    /// the upsert is issued, and a failed write restores the exact value
    /// captured at issue time.
    pub async fn set_checked(&mut self, assignment_id: &str, checked: bool) -> Result<(), AppError> {
        let assignment = self
            .assignments
            .iter_mut()
            .find(|a| a.id == assignment_id)
            .ok_or_else(|| AppError::BadRequest(format!("unknown assignment {assignment_id}")))?;
        let previous = assignment.checked;
        assignment.checked = checked;

        match self
            .client
            .set_assignment_checked(&self.user, assignment_id, checked)
            .await
        {
            Ok(()) => Ok(()),
            Err(err) => {
                warn!("checked update for {assignment_id} failed, rolling back: {err}");
                if let Some(assignment) =
                    self.assignments.iter_mut().find(|a| a.id == assignment_id)
                {
                    // Roll back only if no later update replaced the value
                    // this write put there.
                    if assignment.checked == checked {
                        assignment.checked = previous;
                    }
                }
                Err(err)
            }
        }
    }

    /// Creates an assignment and refreshes the agenda on success.
    pub async fn create_assignment(
        &mut self,
        req: &NewAssignmentRequest,
    ) -> Result<Assignment, AppError> {
        req.validate()?;
        let created = self.client.create_assignment(req).await?;
        info!("created assignment {}", created.id);
        self.load().await;
        Ok(created)
    }

    /// Assignments still worth scheduling: due at or after `now` and not
    /// already time-blocked on the calendar.
    pub fn upcoming_unblocked(&self, events: &EventStore, now: NaiveDateTime) -> Vec<&Assignment> {
        let blocked = events.time_blocked_assignment_ids();
        self.assignments
            .iter()
            .filter(|a| a.due_date >= now && !blocked.contains(&a.id))
            .collect()
    }
}
