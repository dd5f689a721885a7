use std::collections::HashSet;

use chrono::{Duration, NaiveDateTime};
use serde::Serialize;

use crate::models::{Assignment, palette};

/// Default length of a freshly placed time block, in minutes.
pub const TIME_BLOCK_DEFAULT_MINUTES: i64 = 45;
/// Window given to a due-date marker so it is visible on the calendar.
pub const DUE_WINDOW_MINUTES: i64 = 20;
/// Estimates at or below this are ignored in favor of the default block.
pub const MIN_ESTIMATE_MINUTES: i64 = 15;

/// Prefix keeping a time-block id distinct from the due-date marker id of
/// the same assignment.
pub const TIME_BLOCK_PREFIX: &str = "time-block-";

pub fn time_block_id(assignment_id: &str) -> String {
    format!("{TIME_BLOCK_PREFIX}{assignment_id}")
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarEvent {
    pub id: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub title: String,
    pub color: String,
    pub title_color: String,
}

/// Due-date marker for one assignment. The window normally extends forward
/// from the due instant; when that would cross midnight it extends backward
/// instead, so a marker never spans two days.
pub fn due_date_event(assignment: &Assignment) -> CalendarEvent {
    let due = assignment.due_date;
    let window = Duration::minutes(DUE_WINDOW_MINUTES);

    let (start, end) = if (due + window).date() != due.date() {
        (due - window, due)
    } else {
        (due, due + window)
    };

    CalendarEvent {
        id: assignment.id.clone(),
        start,
        end,
        title: assignment.assignment_name.clone(),
        color: assignment.course.course_color.clone(),
        title_color: palette::accent_shade(&assignment.course.course_color).to_string(),
    }
}

pub fn due_date_events(assignments: &[Assignment]) -> Vec<CalendarEvent> {
    assignments.iter().map(due_date_event).collect()
}

/// Draggable block for scheduling work on an assignment, anchored at `now`.
/// The anchor is a placeholder; no free-slot search is attempted.
pub fn time_block_event(assignment: &Assignment, now: NaiveDateTime) -> CalendarEvent {
    let minutes = if assignment.estimated_duration > MIN_ESTIMATE_MINUTES {
        assignment.estimated_duration
    } else {
        TIME_BLOCK_DEFAULT_MINUTES
    };

    CalendarEvent {
        id: time_block_id(&assignment.id),
        start: now,
        end: now + Duration::minutes(minutes),
        title: assignment.assignment_name.clone(),
        color: assignment.course.course_color.clone(),
        title_color: palette::accent_shade(&assignment.course.course_color).to_string(),
    }
}

/// The set of events currently on the calendar surface.
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<CalendarEvent>,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the store as one due-date marker per assignment. Called
    /// whenever the assignment collection is refreshed.
    pub fn reset_from_assignments(&mut self, assignments: &[Assignment]) {
        self.events = due_date_events(assignments);
    }

    pub fn events(&self) -> &[CalendarEvent] {
        &self.events
    }

    pub fn get(&self, event_id: &str) -> Option<&CalendarEvent> {
        self.events.iter().find(|e| e.id == event_id)
    }

    pub fn add(&mut self, event: CalendarEvent) {
        self.events.push(event);
    }

    pub fn remove(&mut self, event_id: &str) {
        self.events.retain(|e| e.id != event_id);
    }

    /// Replaces an event's start and end, returning the updated event.
    pub fn update_times(
        &mut self,
        event_id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Option<CalendarEvent> {
        let event = self.events.iter_mut().find(|e| e.id == event_id)?;
        event.start = start;
        event.end = end;
        Some(event.clone())
    }

    /// Ids of assignments that already have a time block placed.
    pub fn time_blocked_assignment_ids(&self) -> HashSet<String> {
        self.events
            .iter()
            .filter_map(|e| e.id.strip_prefix(TIME_BLOCK_PREFIX))
            .map(str::to_string)
            .collect()
    }
}
