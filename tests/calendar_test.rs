use chrono::NaiveDateTime;

use agenda::calendar::{
    EventStore, TIME_BLOCK_PREFIX, due_date_event, due_date_events, time_block_event,
    time_block_id,
};
use agenda::models::palette;
use agenda::models::{Assignment, Course};

fn course() -> Course {
    Course {
        id: "c1".to_string(),
        course_number: "MATH 51".to_string(),
        course_name: "Linear Algebra".to_string(),
        course_color: "#FAECEC".to_string(),
    }
}

fn datetime(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").expect("valid datetime")
}

fn assignment(id: &str, due: &str, estimated_duration: i64) -> Assignment {
    Assignment {
        id: id.to_string(),
        assignment_name: format!("Problem Set {id}"),
        due_date: datetime(due),
        estimated_duration,
        checked: false,
        course: course(),
    }
}

#[test]
fn due_event_extends_forward_within_the_day() {
    let event = due_date_event(&assignment("a", "2025-01-15 10:00", 60));

    assert_eq!(event.start, datetime("2025-01-15 10:00"));
    assert_eq!(event.end, datetime("2025-01-15 10:20"));
    assert_eq!(event.id, "a");
}

#[test]
fn due_event_near_midnight_extends_backward() {
    // 23:50 + 20 minutes would land on the next day.
    let event = due_date_event(&assignment("a", "2025-01-15 23:50", 60));

    assert_eq!(event.start, datetime("2025-01-15 23:30"));
    assert_eq!(event.end, datetime("2025-01-15 23:50"));
    assert_eq!(event.start.date(), event.end.date());
}

#[test]
fn due_event_ending_exactly_at_midnight_extends_backward() {
    let event = due_date_event(&assignment("a", "2025-01-15 23:40", 60));

    assert_eq!(event.start, datetime("2025-01-15 23:20"));
    assert_eq!(event.end, datetime("2025-01-15 23:40"));
}

#[test]
fn due_event_carries_course_colors() {
    let event = due_date_event(&assignment("a", "2025-01-15 10:00", 60));

    assert_eq!(event.color, "#FAECEC");
    assert_eq!(event.title_color, palette::accent_shade("#FAECEC"));
    assert_ne!(event.title_color, palette::DEFAULT_SHADE);
}

#[test]
fn time_block_uses_estimate_when_above_threshold() {
    let now = datetime("2025-01-12 14:00");
    let event = time_block_event(&assignment("a", "2025-01-15 10:00", 90), now);

    assert_eq!(event.start, now);
    assert_eq!(event.end, datetime("2025-01-12 15:30"));
}

#[test]
fn time_block_falls_back_to_default_length() {
    let now = datetime("2025-01-12 14:00");

    // 15 minutes is at the threshold, not above it.
    let event = time_block_event(&assignment("a", "2025-01-15 10:00", 15), now);
    assert_eq!(event.end, datetime("2025-01-12 14:45"));
}

#[test]
fn time_block_id_is_prefixed_and_distinct() {
    assert_eq!(time_block_id("abc"), format!("{TIME_BLOCK_PREFIX}abc"));
    assert_ne!(time_block_id("abc"), "abc");

    // Both the marker and the block can live in the store at once.
    let mut store = EventStore::new();
    let a = assignment("abc", "2025-01-15 10:00", 60);
    store.add(due_date_event(&a));
    store.add(time_block_event(&a, datetime("2025-01-12 14:00")));
    assert_eq!(store.events().len(), 2);
}

#[test]
fn store_resets_to_one_marker_per_assignment() {
    let assignments = vec![
        assignment("a", "2025-01-15 10:00", 60),
        assignment("b", "2025-01-16 10:00", 60),
    ];

    let mut store = EventStore::new();
    store.add(time_block_event(&assignments[0], datetime("2025-01-12 14:00")));
    store.reset_from_assignments(&assignments);

    assert_eq!(store.events(), &due_date_events(&assignments)[..]);
}

#[test]
fn store_updates_event_times_in_place() {
    let mut store = EventStore::new();
    let a = assignment("a", "2025-01-15 10:00", 60);
    store.add(time_block_event(&a, datetime("2025-01-12 14:00")));

    let updated = store
        .update_times(
            &time_block_id("a"),
            datetime("2025-01-13 09:00"),
            datetime("2025-01-13 10:30"),
        )
        .expect("event exists");

    assert_eq!(updated.start, datetime("2025-01-13 09:00"));
    assert_eq!(store.get(&time_block_id("a")).expect("kept").end, datetime("2025-01-13 10:30"));
    assert!(store.update_times("missing", updated.start, updated.end).is_none());
}

#[test]
fn store_remove_only_touches_matching_id() {
    let mut store = EventStore::new();
    let a = assignment("a", "2025-01-15 10:00", 60);
    store.add(due_date_event(&a));
    store.add(time_block_event(&a, datetime("2025-01-12 14:00")));

    store.remove("a");

    assert_eq!(store.events().len(), 1);
    assert!(store.get(&time_block_id("a")).is_some());
}

#[test]
fn store_reports_time_blocked_assignments() {
    let mut store = EventStore::new();
    let a = assignment("a", "2025-01-15 10:00", 60);
    let b = assignment("b", "2025-01-16 10:00", 60);
    store.add(due_date_event(&a));
    store.add(due_date_event(&b));
    store.add(time_block_event(&b, datetime("2025-01-12 14:00")));

    let blocked = store.time_blocked_assignment_ids();
    assert!(blocked.contains("b"));
    assert!(!blocked.contains("a"));
}
