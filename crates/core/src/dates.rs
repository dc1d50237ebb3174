//! Normalisation of server timestamps into absolute instants.
//!
//! The event API emits timestamps that look naive (`2024-06-01T10:00:00`) but are
//! implicitly UTC. Every server timestamp that is rendered or compared locally must go
//! through [`normalize_to_absolute`], otherwise each viewer would see times shifted by
//! their own UTC offset.

use chrono::{
    DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, SecondsFormat, TimeZone, Utc,
};
use tracing::{debug, warn};

/// Layouts accepted for the wall-clock part of a timestamp, offset already removed.
const NAIVE_LAYOUTS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Outcome of normalising a raw timestamp.
///
/// `Fallback` carries the substitute instant used when the input was empty or could
/// not be parsed. It keeps the UI rendering something, but it is not a validated value
/// and callers that care about fidelity should check [`Normalized::is_fallback`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalized {
    Parsed(DateTime<FixedOffset>),
    Fallback(DateTime<FixedOffset>),
}

impl Normalized {
    pub fn instant(&self) -> DateTime<FixedOffset> {
        match *self {
            Normalized::Parsed(instant) | Normalized::Fallback(instant) => instant,
        }
    }

    pub fn to_utc(&self) -> DateTime<Utc> {
        self.instant().with_timezone(&Utc)
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Normalized::Fallback(_))
    }
}

/// Normalise `raw` into an absolute instant, falling back to the current moment.
pub fn normalize_to_absolute(raw: &str) -> Normalized {
    normalize_or(raw, Utc::now())
}

/// Normalise `raw`, substituting `fallback` for empty or unparsable input.
pub fn normalize_or(raw: &str, fallback: DateTime<Utc>) -> Normalized {
    match parse_absolute(raw) {
        Some(instant) => Normalized::Parsed(instant),
        None => {
            if raw.trim().is_empty() {
                debug!("empty timestamp, using fallback instant {}", fallback);
            } else {
                warn!(raw, "unparsable timestamp, using fallback instant {}", fallback);
            }
            Normalized::Fallback(fallback.fixed_offset())
        }
    }
}

/// Strictly parse `raw` as an absolute instant.
///
/// A trailing `Z`, `±HH`, `±HHMM` or `±HH:MM` on the time part is honoured as given.
/// Anything without an offset, including a bare date, is read as UTC.
pub fn parse_absolute(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let (local, offset) = split_offset(raw)?;
    let naive = parse_naive(local)?;
    let offset = offset.unwrap_or_else(utc_offset);

    offset.from_local_datetime(&naive).single()
}

/// Canonical round-trip form of an instant: UTC, millisecond precision, `Z` suffix.
///
/// Lexicographic order on this form equals chronological order.
pub fn canonical(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn utc_offset() -> FixedOffset {
    Utc.fix()
}

fn split_offset(raw: &str) -> Option<(&str, Option<FixedOffset>)> {
    if let Some(local) = raw.strip_suffix(['Z', 'z']) {
        return Some((local, Some(utc_offset())));
    }

    // Only the time part can carry an offset; the dashes of the date never count.
    let Some(separator) = raw.find(['T', 't', ' ']) else {
        return Some((raw, None));
    };
    let time = &raw[separator + 1..];

    match time.rfind(['+', '-']) {
        Some(sign_at) => {
            let offset = parse_offset(&time[sign_at..])?;
            Some((&raw[..separator + 1 + sign_at], Some(offset)))
        }
        None => Some((raw, None)),
    }
}

fn parse_offset(text: &str) -> Option<FixedOffset> {
    if !text.is_ascii() {
        return None;
    }

    let sign = match text.as_bytes().first()? {
        b'+' => 1,
        b'-' => -1,
        _ => return None,
    };
    let rest = &text[1..];
    let (hours, minutes) = match rest.len() {
        2 => (rest, "00"),
        4 => (&rest[..2], &rest[2..]),
        5 if rest.as_bytes()[2] == b':' => (&rest[..2], &rest[3..]),
        _ => return None,
    };
    if !hours.bytes().chain(minutes.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }

    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if minutes >= 60 {
        return None;
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

fn parse_naive(local: &str) -> Option<NaiveDateTime> {
    // RFC 3339 allows a lowercase separator; the layouts only know `T`.
    let local = local.replace('t', "T");
    NAIVE_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(&local, layout).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(&local, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Fallback used by serde when a timestamp field is missing entirely.
pub fn fallback_now() -> DateTime<Utc> {
    debug!("missing timestamp field, using current instant");
    Utc::now()
}

/// Serde adapter for server timestamps.
///
/// Deserialisation runs through [`normalize_to_absolute`] so naive server values are
/// read as UTC and bad values degrade instead of failing the whole payload.
/// Serialisation writes RFC 3339 in UTC.
pub mod lenient {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(instant: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&instant.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(super::normalize_to_absolute(raw.as_deref().unwrap_or_default()).to_utc())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_is_only_read_from_the_time_part() {
        assert_eq!(split_offset("2024-06-01"), Some(("2024-06-01", None)));
        assert_eq!(
            split_offset("2024-06-01T10:00:00"),
            Some(("2024-06-01T10:00:00", None))
        );
    }

    #[test]
    fn offset_forms() {
        let east = FixedOffset::east_opt(5 * 3600 + 30 * 60);
        assert_eq!(parse_offset("+05:30"), east);
        assert_eq!(parse_offset("+0530"), east);
        assert_eq!(parse_offset("-08"), FixedOffset::west_opt(8 * 3600));
        assert_eq!(parse_offset("+5:30"), None);
        assert_eq!(parse_offset("+05:75"), None);
        assert_eq!(parse_offset("+0a:00"), None);
    }

    #[test]
    fn malformed_offset_rejects_whole_timestamp() {
        assert_eq!(parse_absolute("2024-06-01T10:00:00+5"), None);
    }
}
