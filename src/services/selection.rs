use chrono::NaiveDateTime;

use crate::calendar::{self, CalendarEvent, EventStore};
use crate::models::Assignment;

/// What the calendar surface currently has selected.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Selection {
    #[default]
    Idle,
    /// An assignment picked for detail display and tentative time blocking.
    Assignment {
        assignment: Assignment,
        event_id: String,
        dragged: bool,
    },
    /// An already-placed block selected by long-press. No assignment
    /// reference travels with it and it is never auto-removed.
    ExternalEvent { event_id: String },
}

#[derive(Debug, Default)]
pub struct SelectionController {
    selection: Selection,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selected_assignment(&self) -> Option<&Assignment> {
        match &self.selection {
            Selection::Assignment { assignment, .. } => Some(assignment),
            _ => None,
        }
    }

    pub fn selected_event_id(&self) -> Option<&str> {
        match &self.selection {
            Selection::Assignment { event_id, .. } | Selection::ExternalEvent { event_id } => {
                Some(event_id)
            }
            Selection::Idle => None,
        }
    }

    /// Selects an assignment: synthesizes a time block anchored at `now`,
    /// puts it on the calendar and returns it so the caller can scroll the
    /// view to its start. The block starts out tentative.
    pub fn select_assignment(
        &mut self,
        assignment: Assignment,
        events: &mut EventStore,
        now: NaiveDateTime,
    ) -> CalendarEvent {
        // A still-tentative block from a previous selection is discarded.
        self.clear(events);

        let event = calendar::time_block_event(&assignment, now);
        events.add(event.clone());
        self.selection = Selection::Assignment {
            assignment,
            event_id: event.id.clone(),
            dragged: false,
        };
        event
    }

    /// Long-press on an event already on the calendar. Returns false for an
    /// unknown event id.
    pub fn select_existing_event(&mut self, event_id: &str, events: &mut EventStore) -> bool {
        if events.get(event_id).is_none() {
            return false;
        }
        self.clear(events);
        self.selection = Selection::ExternalEvent {
            event_id: event_id.to_string(),
        };
        true
    }

    /// Drag started on the selected event.
    pub fn mark_dragged(&mut self) {
        if let Selection::Assignment { dragged, .. } = &mut self.selection {
            *dragged = true;
        }
    }

    /// Drag finished: the selected event takes the user-chosen times and the
    /// block is kept from then on.
    pub fn drag_end(
        &mut self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        events: &mut EventStore,
    ) -> Option<CalendarEvent> {
        match &mut self.selection {
            Selection::Assignment {
                event_id, dragged, ..
            } => {
                let updated = events.update_times(event_id, start, end)?;
                *dragged = true;
                Some(updated)
            }
            Selection::ExternalEvent { event_id } => events.update_times(event_id, start, end),
            Selection::Idle => None,
        }
    }

    /// Clears the selection. A tentative block that was never dragged is
    /// removed from the calendar; anything the user placed stays.
    pub fn clear(&mut self, events: &mut EventStore) {
        if let Selection::Assignment {
            event_id,
            dragged: false,
            ..
        } = &self.selection
        {
            events.remove(event_id);
        }
        self.selection = Selection::Idle;
    }
}
