//! Human-readable labels for slots, windows and suggested times in a viewer's timezone.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::slots::{TimeSlot, TimeWindow};

/// Three-line label shown on a slot button, e.g. `Sat, Mar 9` / `9:00` / `AM`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotLabel {
    pub day: String,
    pub time: String,
    pub meridiem: String,
}

pub fn slot_label(slot: &TimeSlot, tz: &Tz) -> SlotLabel {
    let local = slot.start().with_timezone(tz);
    SlotLabel {
        day: local.format("%a, %b %-d").to_string(),
        time: local.format("%-I:%M").to_string(),
        meridiem: local.format("%p").to_string(),
    }
}

/// `Mar 9 - Mar 10, 2024`
pub fn format_window(window: &TimeWindow, tz: &Tz) -> String {
    let start = window.start().with_timezone(tz);
    let end = window.end().with_timezone(tz);
    format!("{} - {}", start.format("%b %-d"), end.format("%b %-d, %Y"))
}

/// `Sat, Mar 9 · 9:00 AM - 12:00 PM`
pub fn format_time_range(start: &DateTime<Utc>, end: &DateTime<Utc>, tz: &Tz) -> String {
    let start = start.with_timezone(tz);
    let end = end.with_timezone(tz);
    format!(
        "{} · {} - {}",
        start.format("%a, %b %-d"),
        start.format("%-I:%M %p"),
        end.format("%-I:%M %p")
    )
}

pub fn selection_summary(count: usize) -> String {
    if count == 1 {
        "1 hour selected".to_string()
    } else {
        format!("{} hours selected", count)
    }
}
