use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dates;
use crate::errors::{MidwayError, MidwayResult};
use crate::models::participant::ParticipantBasic;
use crate::slots::TimeWindow;

pub const MAX_TITLE_LEN: usize = 200;

/// Layout of the local wall-clock bounds sent when creating an event.
pub const LOCAL_WALL_CLOCK: &str = "%Y-%m-%dT%H:%M";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    #[serde(with = "dates::lenient", default = "dates::fallback_now")]
    pub window_start: DateTime<Utc>,
    #[serde(with = "dates::lenient", default = "dates::fallback_now")]
    pub window_end: DateTime<Utc>,
    pub status: String,
    #[serde(with = "dates::lenient", default = "dates::fallback_now")]
    pub created_at: DateTime<Utc>,
}

impl Event {
    pub fn window(&self) -> TimeWindow {
        TimeWindow::new(self.window_start, self.window_end)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDetail {
    #[serde(flatten)]
    pub event: Event,
    #[serde(default)]
    pub participants: Vec<ParticipantBasic>,
}

impl EventDetail {
    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    pub fn host(&self) -> Option<&ParticipantBasic> {
        self.participants.iter().find(|p| p.is_host)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    #[serde(with = "local_wall_clock")]
    pub window_start: NaiveDateTime,
    #[serde(with = "local_wall_clock")]
    pub window_end: NaiveDateTime,
}

impl CreateEventRequest {
    /// Build a validated request. The bounds are the host's local wall clock and are
    /// sent without an offset.
    pub fn new(
        title: impl Into<String>,
        window_start: NaiveDateTime,
        window_end: NaiveDateTime,
    ) -> MidwayResult<Self> {
        let request = Self {
            title: title.into(),
            window_start,
            window_end,
        };
        request.validate()?;
        Ok(request)
    }

    pub fn validate(&self) -> MidwayResult<()> {
        if self.title.trim().is_empty() {
            return Err(MidwayError::Validation("Please enter an event title".into()));
        }
        if self.title.chars().count() > MAX_TITLE_LEN {
            return Err(MidwayError::Validation(format!(
                "Event title must be at most {} characters",
                MAX_TITLE_LEN
            )));
        }
        if self.window_start >= self.window_end {
            return Err(MidwayError::Validation(
                "The end time must be after the start time".into(),
            ));
        }
        Ok(())
    }
}

/// The coming weekend as a default window: Saturday 09:00 to Sunday 22:00.
///
/// When `today` is a Saturday the window starts today.
pub fn this_weekend(today: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let days_until_saturday = 6 - i64::from(today.weekday().num_days_from_sunday());
    let saturday = today + Duration::days(days_until_saturday);
    let sunday = saturday + Duration::days(1);

    (
        saturday.and_time(NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default()),
        sunday.and_time(NaiveTime::from_hms_opt(22, 0, 0).unwrap_or_default()),
    )
}

mod local_wall_clock {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::LOCAL_WALL_CLOCK;

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format(LOCAL_WALL_CLOCK).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, LOCAL_WALL_CLOCK).map_err(serde::de::Error::custom)
    }
}
