use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};

use crate::calendar::{CalendarEvent, EventStore};
use crate::services::{AgendaService, SelectionController};
use crate::supabase::{SupabaseClient, User};
use crate::timeline::{self, TimelineItem};

/// Everything the screens mutate, owned by the single UI task.
pub struct AppState {
    pub agenda: AgendaService,
    pub events: EventStore,
    pub selection: SelectionController,
}

impl AppState {
    pub fn new(client: Arc<dyn SupabaseClient>, user: User) -> Self {
        Self {
            agenda: AgendaService::new(client, user),
            events: EventStore::new(),
            selection: SelectionController::new(),
        }
    }

    /// Loads the agenda and rebuilds the calendar's due-date markers from
    /// the refreshed assignments.
    pub async fn load(&mut self) {
        self.agenda.load().await;
        self.events.reset_from_assignments(self.agenda.assignments());
    }

    /// Dense agenda timeline over the current assignments.
    pub fn timeline(&self, today: NaiveDate) -> Vec<TimelineItem> {
        timeline::build_timeline(self.agenda.assignments(), today)
    }

    /// Tap on an assignment in the bottom sheet. Returns the synthesized
    /// block so the caller can scroll the calendar to it.
    pub fn select_assignment(
        &mut self,
        assignment_id: &str,
        now: NaiveDateTime,
    ) -> Option<CalendarEvent> {
        let assignment = self
            .agenda
            .assignments()
            .iter()
            .find(|a| a.id == assignment_id)?
            .clone();
        Some(
            self.selection
                .select_assignment(assignment, &mut self.events, now),
        )
    }

    /// Long-press on an event already on the calendar.
    pub fn long_press_event(&mut self, event_id: &str) -> bool {
        self.selection
            .select_existing_event(event_id, &mut self.events)
    }

    pub fn drag_start(&mut self) {
        self.selection.mark_dragged();
    }

    pub fn drag_end(&mut self, start: NaiveDateTime, end: NaiveDateTime) -> Option<CalendarEvent> {
        self.selection.drag_end(start, end, &mut self.events)
    }

    /// Tap on the calendar background.
    pub fn press_background(&mut self) {
        self.selection.clear(&mut self.events);
    }
}
