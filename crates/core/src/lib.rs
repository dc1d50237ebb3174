//! # Midway core
//!
//! Domain types for the Midway event-coordination client: the wire models of the event
//! API, the hourly slot engine that turns a participant's picks into availability
//! intervals, and the date handling that keeps server timestamps anchored to UTC.
//!
//! Nothing in this crate performs I/O.

pub mod dates;
pub mod display;
pub mod errors;
pub mod models;
pub mod slots;

pub use dates::{Normalized, normalize_to_absolute};
pub use errors::{MidwayError, MidwayResult};
pub use slots::{
    AvailabilityInterval, SelectedSlots, SlotSelection, TimeSlot, TimeWindow, Toggle,
    generate_slots, merge_intervals,
};
