//! Hourly slot selection and availability interval merging.
//!
//! A [`TimeWindow`] offers one-hour [`TimeSlot`]s. The participant toggles slots in a
//! [`SelectedSlots`] set, and [`merge_intervals`] collapses that set into the minimal
//! list of contiguous [`AvailabilityInterval`]s submitted to the API.
//!
//! Everything here is pure and compares absolute instants, never formatted strings.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::dates;
use crate::errors::{MidwayError, MidwayResult};

/// Length of a single slot.
pub fn slot_length() -> Duration {
    Duration::hours(1)
}

/// The host-defined period in which slots are offered, `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeWindow {
    /// Windows with `start >= end` are allowed and simply offer no slots.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn slots(&self) -> Vec<TimeSlot> {
        generate_slots(self)
    }

    /// Whether `slot` is one of the slots this window offers.
    pub fn offers(&self, slot: &TimeSlot) -> bool {
        let instant = slot.start();
        instant >= self.start
            && instant < self.end
            && (instant - self.start).num_milliseconds() % slot_length().num_milliseconds() == 0
            && instant.checked_add_signed(slot_length()).is_some()
    }
}

/// Start of a one-hour slot `[start, start + 1h)`.
///
/// Ordering is chronological. The canonical identifier (see [`TimeSlot::id`]) is the
/// UTC round-trip string, so string order and instant order agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeSlot(DateTime<Utc>);

impl TimeSlot {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self(start)
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.0
    }

    /// Saturates at the latest representable instant.
    pub fn end(&self) -> DateTime<Utc> {
        self.0
            .checked_add_signed(slot_length())
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    pub fn id(&self) -> String {
        dates::canonical(&self.0)
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id())
    }
}

impl FromStr for TimeSlot {
    type Err = MidwayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        dates::parse_absolute(s)
            .map(|instant| TimeSlot(instant.with_timezone(&Utc)))
            .ok_or_else(|| MidwayError::Validation(format!("Invalid time slot: {}", s)))
    }
}

/// One maximal run of selected slots, `[start_time, end_time)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityInterval {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl AvailabilityInterval {
    pub fn hours(&self) -> i64 {
        (self.end_time - self.start_time).num_hours()
    }
}

/// Generate the slots offered by `window`.
///
/// Starts at `window.start` and steps one hour at a time while strictly before
/// `window.end`. The window bounds do not need to be hour-aligned.
pub fn generate_slots(window: &TimeWindow) -> Vec<TimeSlot> {
    let mut slots = Vec::new();
    let mut current = window.start;

    // A slot whose end cannot be represented is never offered.
    while current < window.end {
        let Some(next) = current.checked_add_signed(slot_length()) else {
            break;
        };
        slots.push(TimeSlot(current));
        current = next;
    }

    slots
}

/// Merge slots into ascending, disjoint, end-exclusive intervals.
///
/// Input order and duplicates do not matter. Two slots belong to the same interval
/// only if the later one starts exactly one hour after the earlier one.
pub fn merge_intervals<I>(slots: I) -> Vec<AvailabilityInterval>
where
    I: IntoIterator<Item = TimeSlot>,
{
    let sorted: BTreeSet<TimeSlot> = slots.into_iter().collect();
    let mut sorted = sorted.into_iter();

    let Some(first) = sorted.next() else {
        return Vec::new();
    };

    let mut intervals = Vec::new();
    let mut range_start = first;
    let mut previous = first;

    for slot in sorted {
        if slot.start() != previous.end() {
            intervals.push(AvailabilityInterval {
                start_time: range_start.start(),
                end_time: previous.end(),
            });
            range_start = slot;
        }
        previous = slot;
    }

    intervals.push(AvailabilityInterval {
        start_time: range_start.start(),
        end_time: previous.end(),
    });

    intervals
}

/// The set of slots a participant has picked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectedSlots(BTreeSet<TimeSlot>);

impl SelectedSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `slot` if absent, remove it if present. Returns whether it is now selected.
    pub fn toggle(&mut self, slot: TimeSlot) -> bool {
        if self.0.remove(&slot) {
            false
        } else {
            self.0.insert(slot);
            true
        }
    }

    /// Copy of the set with `slot` toggled.
    pub fn toggled(&self, slot: TimeSlot) -> Self {
        let mut next = self.clone();
        next.toggle(slot);
        next
    }

    pub fn contains(&self, slot: &TimeSlot) -> bool {
        self.0.contains(slot)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TimeSlot> {
        self.0.iter()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn intervals(&self) -> Vec<AvailabilityInterval> {
        merge_intervals(self.0.iter().copied())
    }
}

impl FromIterator<TimeSlot> for SelectedSlots {
    fn from_iter<T: IntoIterator<Item = TimeSlot>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Result of toggling a slot through a [`SlotSelection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Selected,
    Deselected,
    /// The slot is not offered by the current window; nothing changed.
    OutsideWindow,
}

/// Slot picker state for one window: offered slots, the selection and the derived
/// interval list.
///
/// The interval list is recomputed inside every mutating call, so a reader never sees
/// intervals that disagree with the selection.
#[derive(Debug, Clone)]
pub struct SlotSelection {
    window: TimeWindow,
    slots: Vec<TimeSlot>,
    selected: SelectedSlots,
    intervals: Vec<AvailabilityInterval>,
}

impl SlotSelection {
    pub fn new(window: TimeWindow) -> Self {
        Self {
            window,
            slots: generate_slots(&window),
            selected: SelectedSlots::new(),
            intervals: Vec::new(),
        }
    }

    pub fn window(&self) -> &TimeWindow {
        &self.window
    }

    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    pub fn selected(&self) -> &SelectedSlots {
        &self.selected
    }

    pub fn is_selected(&self, slot: &TimeSlot) -> bool {
        self.selected.contains(slot)
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    pub fn intervals(&self) -> &[AvailabilityInterval] {
        &self.intervals
    }

    pub fn toggle(&mut self, slot: TimeSlot) -> Toggle {
        if self.slots.binary_search(&slot).is_err() {
            return Toggle::OutsideWindow;
        }

        let selected = self.selected.toggle(slot);
        self.intervals = self.selected.intervals();

        if selected {
            Toggle::Selected
        } else {
            Toggle::Deselected
        }
    }

    /// Toggle a slot by its identifier string.
    pub fn toggle_id(&mut self, id: &str) -> MidwayResult<Toggle> {
        let slot = id.parse::<TimeSlot>()?;
        Ok(self.toggle(slot))
    }

    /// Replace the window. A different window regenerates the slots and clears the
    /// selection; the same window leaves everything untouched.
    pub fn set_window(&mut self, window: TimeWindow) {
        if window == self.window {
            return;
        }
        *self = Self::new(window);
    }

    pub fn clear(&mut self) {
        self.selected.clear();
        self.intervals.clear();
    }
}
