use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::models::Assignment;

/// How many past sections one upward scroll loads.
pub const PAST_BATCH_SIZE: usize = 7;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateSection {
    pub date: NaiveDate,
    pub label: String,
    pub assignments: Vec<Assignment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GapSection {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub label: String,
}

/// One row of the agenda list: a calendar day with its assignments, or a
/// collapsed run of empty days.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimelineItem {
    Date(DateSection),
    Gap(GapSection),
}

impl TimelineItem {
    /// Canonical ordering key. Unique across a built timeline; gap keys are
    /// prefixed so they cannot collide with date keys.
    pub fn date_key(&self) -> String {
        match self {
            TimelineItem::Date(section) => date_key(section.date),
            TimelineItem::Gap(gap) => format!("gap-{}", date_key(gap.start)),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            TimelineItem::Date(section) => &section.label,
            TimelineItem::Gap(gap) => &gap.label,
        }
    }

    /// First day the item covers.
    pub fn start_date(&self) -> NaiveDate {
        match self {
            TimelineItem::Date(section) => section.date,
            TimelineItem::Gap(gap) => gap.start,
        }
    }
}

pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// "Wed, Jan 15"
fn day_label(date: NaiveDate) -> String {
    date.format("%a, %b %-d").to_string()
}

/// "Jan 3" for a single day, "Jan 3 - Jan 9" otherwise.
pub fn format_date_range(start: NaiveDate, end: NaiveDate) -> String {
    if start == end {
        start.format("%b %-d").to_string()
    } else {
        format!("{} - {}", start.format("%b %-d"), end.format("%b %-d"))
    }
}

/// "3:45 PM"
pub fn time_label(at: NaiveDateTime) -> String {
    at.format("%-I:%M %p").to_string()
}

fn sort_and_bucket(assignments: &[Assignment]) -> BTreeMap<NaiveDate, Vec<Assignment>> {
    let mut sorted: Vec<Assignment> = assignments.to_vec();
    // Stable, so assignments sharing a due instant keep their input order.
    sorted.sort_by_key(|a| a.due_date);

    let mut by_day: BTreeMap<NaiveDate, Vec<Assignment>> = BTreeMap::new();
    for assignment in sorted {
        by_day.entry(assignment.due_day()).or_default().push(assignment);
    }
    by_day
}

/// Sparse timeline: one section per day that has at least one assignment,
/// ascending, with no gap markers and no today handling.
pub fn build_sparse_timeline(assignments: &[Assignment]) -> Vec<TimelineItem> {
    sort_and_bucket(assignments)
        .into_iter()
        .map(|(date, assignments)| {
            TimelineItem::Date(DateSection {
                date,
                label: day_label(date),
                assignments,
            })
        })
        .collect()
}

/// Dense timeline: walks every day from min(today, earliest due day) through
/// the latest due day. Days with assignments, and today itself, become date
/// sections; each maximal run of other days collapses into a single gap.
pub fn build_timeline(assignments: &[Assignment], today: NaiveDate) -> Vec<TimelineItem> {
    if assignments.is_empty() {
        return Vec::new();
    }

    let mut by_day = sort_and_bucket(assignments);
    // Non-empty input, so the bucket map has a first and last key.
    let earliest = by_day.keys().next().copied().unwrap_or(today);
    let latest = by_day.keys().next_back().copied().unwrap_or(today);

    let mut timeline = Vec::new();
    let mut gap_start: Option<NaiveDate> = None;
    let mut day = earliest.min(today);

    while day <= latest {
        let assignments_due = by_day.remove(&day);
        let is_today = day == today;

        if assignments_due.is_some() || is_today {
            if let Some(start) = gap_start.take() {
                let end = day.pred_opt().unwrap_or(start);
                timeline.push(TimelineItem::Gap(GapSection {
                    start,
                    end,
                    label: format_date_range(start, end),
                }));
            }

            let label = if is_today {
                format!("Today: {}", day_label(day))
            } else {
                day_label(day)
            };
            timeline.push(TimelineItem::Date(DateSection {
                date: day,
                label,
                assignments: assignments_due.unwrap_or_default(),
            }));
        } else if gap_start.is_none() {
            gap_start = Some(day);
        }

        let Some(next) = day.succ_opt() else { break };
        day = next;
    }

    timeline
}

/// Index to anchor the agenda list at: today's section if present, else the
/// first section at or after today, else the start. `None` only for an
/// empty timeline.
pub fn find_nearest_index(timeline: &[TimelineItem], today: NaiveDate) -> Option<usize> {
    if timeline.is_empty() {
        return None;
    }

    let today_section = timeline
        .iter()
        .position(|item| matches!(item, TimelineItem::Date(section) if section.date == today));
    if today_section.is_some() {
        return today_section;
    }

    timeline
        .iter()
        .position(|item| item.start_date() >= today)
        .or(Some(0))
}

/// Cursor for loading past sections incrementally. The visible slice is a
/// suffix of the full timeline, so loading earlier sections can only grow
/// it and never reorders or duplicates anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelinePager {
    start: usize,
}

impl TimelinePager {
    pub fn new(start: usize) -> Self {
        Self { start }
    }

    /// Anchors at the nearest section to today, or the start for an empty
    /// timeline.
    pub fn anchored(timeline: &[TimelineItem], today: NaiveDate) -> Self {
        Self::new(find_nearest_index(timeline, today).unwrap_or(0))
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn at_start(&self) -> bool {
        self.start == 0
    }

    /// Retreats the cursor by one batch, clamped to the timeline start.
    /// Returns false when there was nothing earlier to load.
    pub fn load_earlier(&mut self) -> bool {
        if self.start == 0 {
            return false;
        }
        self.start = self.start.saturating_sub(PAST_BATCH_SIZE);
        true
    }

    pub fn visible<'a>(&self, timeline: &'a [TimelineItem]) -> &'a [TimelineItem] {
        &timeline[self.start.min(timeline.len())..]
    }
}
