//! Event types.
//!
//! `RemoteEvent` mirrors what the events listing returns, `NewEvent` is the
//! body sent to the insert call, and `EventDraft` is what callers build to
//! describe an event they want to add.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{GbackError, GbackResult};

const STATUS_CANCELLED: &str = "cancelled";

/// An event as returned by the remote events listing or insert call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteEvent {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub start: Option<EventDateTime>,
    #[serde(default)]
    pub end: Option<EventDateTime>,
    #[serde(default)]
    pub html_link: Option<String>,
}

impl RemoteEvent {
    pub fn is_cancelled(&self) -> bool {
        self.status.as_deref() == Some(STATUS_CANCELLED)
    }
}

/// Start or end of a remote event. Whole-day events carry `date`,
/// timed events carry `date_time`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDateTime {
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub date_time: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub time_zone: Option<String>,
}

impl EventDateTime {
    pub fn date(date: NaiveDate) -> Self {
        EventDateTime {
            date: Some(date),
            ..Default::default()
        }
    }

    pub fn date_time(date_time: DateTime<FixedOffset>) -> Self {
        EventDateTime {
            date_time: Some(date_time),
            ..Default::default()
        }
    }
}

/// Request body for the insert call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub start: EventTimeBody,
    pub end: EventTimeBody,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTimeBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    pub time_zone: String,
}

impl EventTimeBody {
    fn whole_day(date: NaiveDate, time_zone: &str) -> Self {
        EventTimeBody {
            date: Some(date.format("%Y-%m-%d").to_string()),
            date_time: None,
            time_zone: time_zone.to_string(),
        }
    }

    fn local(at: NaiveDateTime, time_zone: &str) -> Self {
        EventTimeBody {
            date: None,
            date_time: Some(at.format("%Y-%m-%dT%H:%M:%S").to_string()),
            time_zone: time_zone.to_string(),
        }
    }
}

/// A point in time given on the command line: a bare date or a wall-clock
/// date and time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventPoint {
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl EventPoint {
    /// Parse `YYYYMMDD`, `YYYY-MM-DD`, or either followed by `T` or a space
    /// and `HH:MM[:SS]` / `HHMM[SS]`.
    pub fn parse(input: &str) -> GbackResult<Self> {
        let input = input.trim();
        let invalid = || {
            GbackError::Validation(format!(
                "Invalid date '{}': expected YYYYMMDD or YYYYMMDDTHH:MM[:SS]",
                input
            ))
        };

        let (date_part, time_part) = match input.find(['T', ' ']) {
            Some(idx) => (&input[..idx], Some(input[idx + 1..].trim())),
            None => (input, None),
        };

        let date = parse_date(date_part).ok_or_else(invalid)?;

        match time_part {
            None => Ok(EventPoint::Date(date)),
            Some(time) => {
                let time = parse_time(time).ok_or_else(invalid)?;
                Ok(EventPoint::DateTime(date.and_time(time)))
            }
        }
    }

    pub fn date(&self) -> NaiveDate {
        match self {
            EventPoint::Date(d) => *d,
            EventPoint::DateTime(dt) => dt.date(),
        }
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    if s.len() == 8 && s.bytes().all(|b| b.is_ascii_digit()) {
        let year = s[0..4].parse().ok()?;
        let month = s[4..6].parse().ok()?;
        let day = s[6..8].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

fn parse_time(s: &str) -> Option<NaiveTime> {
    if s.bytes().all(|b| b.is_ascii_digit()) {
        return match s.len() {
            4 => NaiveTime::from_hms_opt(s[0..2].parse().ok()?, s[2..4].parse().ok()?, 0),
            6 => NaiveTime::from_hms_opt(
                s[0..2].parse().ok()?,
                s[2..4].parse().ok()?,
                s[4..6].parse().ok()?,
            ),
            _ => None,
        };
    }
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .ok()
}

/// Whether an event occupies whole days or a span of wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventTiming {
    WholeDay {
        date: NaiveDate,
    },
    Timed {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
}

impl EventTiming {
    /// Build timing from a start and an optional end.
    ///
    /// Without an end the event is a whole-day event on the start's date.
    /// With an end, both points must carry a time of day and the end must
    /// come after the start.
    pub fn from_points(start: EventPoint, end: Option<EventPoint>) -> GbackResult<Self> {
        match (start, end) {
            (start, None) => Ok(EventTiming::WholeDay { date: start.date() }),
            (EventPoint::DateTime(start), Some(EventPoint::DateTime(end))) => {
                EventTiming::timed(start, end)
            }
            _ => Err(GbackError::Validation(
                "A timed event needs a time of day on both start and end".to_string(),
            )),
        }
    }

    pub fn timed(start: NaiveDateTime, end: NaiveDateTime) -> GbackResult<Self> {
        if end <= start {
            return Err(GbackError::Validation(format!(
                "Event end ({}) must be after its start ({})",
                end, start
            )));
        }
        Ok(EventTiming::Timed { start, end })
    }
}

/// An event to be added to a calendar.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDraft {
    pub summary: String,
    pub timing: EventTiming,
    pub description: Option<String>,
    pub location: Option<String>,
}

impl EventDraft {
    pub fn new(summary: impl Into<String>, timing: EventTiming) -> Self {
        EventDraft {
            summary: summary.into(),
            timing,
            description: None,
            location: None,
        }
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description.filter(|d| !d.is_empty());
        self
    }

    pub fn with_location(mut self, location: Option<String>) -> Self {
        self.location = location.filter(|l| !l.is_empty());
        self
    }

    /// Insert body for a calendar in `time_zone`.
    pub fn to_new_event(&self, time_zone: &str) -> NewEvent {
        let (start, end) = match self.timing {
            EventTiming::WholeDay { date } => (
                EventTimeBody::whole_day(date, time_zone),
                EventTimeBody::whole_day(date, time_zone),
            ),
            EventTiming::Timed { start, end } => (
                EventTimeBody::local(start, time_zone),
                EventTimeBody::local(end, time_zone),
            ),
        };

        NewEvent {
            summary: self.summary.clone(),
            description: self.description.clone(),
            location: self.location.clone(),
            start,
            end,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn test_parse_compact_date() {
        assert_eq!(
            EventPoint::parse("20150427").unwrap(),
            EventPoint::Date(NaiveDate::from_ymd_opt(2015, 4, 27).unwrap())
        );
    }

    #[test]
    fn test_parse_dashed_date() {
        assert_eq!(
            EventPoint::parse("2015-04-27").unwrap(),
            EventPoint::Date(NaiveDate::from_ymd_opt(2015, 4, 27).unwrap())
        );
    }

    #[test]
    fn test_parse_datetime_variants() {
        let expected = EventPoint::DateTime(at(2015, 4, 27, 9, 30, 0));
        for input in [
            "20150427 09:30",
            "20150427 09:30:00",
            "20150427T0930",
            "20150427T093000",
            "2015-04-27T09:30",
            "2015-04-27 09:30:00",
        ] {
            assert_eq!(EventPoint::parse(input).unwrap(), expected, "{}", input);
        }
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            EventPoint::parse("2015042"),
            Err(GbackError::Validation(_))
        ));
        assert!(EventPoint::parse("20151340").is_err());
        assert!(EventPoint::parse("20150427T25:00").is_err());
        assert!(EventPoint::parse("tomorrow").is_err());
    }

    #[test]
    fn test_timing_without_end_is_whole_day() {
        let start = EventPoint::parse("20150427 09:00").unwrap();
        let timing = EventTiming::from_points(start, None).unwrap();
        assert_eq!(
            timing,
            EventTiming::WholeDay {
                date: NaiveDate::from_ymd_opt(2015, 4, 27).unwrap()
            }
        );
    }

    #[test]
    fn test_timing_with_date_only_end_is_rejected() {
        let start = EventPoint::parse("20150427 09:00").unwrap();
        let end = EventPoint::parse("20150428").unwrap();
        assert!(matches!(
            EventTiming::from_points(start, Some(end)),
            Err(GbackError::Validation(_))
        ));
    }

    #[test]
    fn test_timing_with_date_only_start_is_rejected() {
        let start = EventPoint::parse("20150427").unwrap();
        let end = EventPoint::parse("20150427 10:00").unwrap();
        assert!(EventTiming::from_points(start, Some(end)).is_err());
    }

    #[test]
    fn test_timing_end_must_follow_start() {
        let t = at(2015, 4, 27, 9, 0, 0);
        assert!(EventTiming::timed(t, t).is_err());
        assert!(EventTiming::timed(t, at(2015, 4, 27, 8, 0, 0)).is_err());
    }

    #[test]
    fn test_whole_day_body_uses_same_date_and_zone() {
        let draft = EventDraft::new(
            "Test",
            EventTiming::from_points(EventPoint::parse("20150427").unwrap(), None).unwrap(),
        );

        let body = draft.to_new_event("Europe/Berlin");
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["start"]["date"], "2015-04-27");
        assert_eq!(json["end"]["date"], "2015-04-27");
        assert_eq!(json["start"]["timeZone"], "Europe/Berlin");
        assert_eq!(json["end"]["timeZone"], "Europe/Berlin");
        assert!(json["start"].get("dateTime").is_none());
        assert!(json.get("description").is_none());
    }

    #[test]
    fn test_timed_body_keeps_wall_clock() {
        let timing = EventTiming::timed(at(2015, 4, 27, 9, 0, 0), at(2015, 4, 27, 10, 30, 15)).unwrap();
        let draft = EventDraft::new("Standup", timing)
            .with_description(Some("daily".to_string()))
            .with_location(Some(String::new()));

        let json = serde_json::to_value(draft.to_new_event("America/New_York")).unwrap();

        assert_eq!(json["start"]["dateTime"], "2015-04-27T09:00:00");
        assert_eq!(json["end"]["dateTime"], "2015-04-27T10:30:15");
        assert_eq!(json["end"]["timeZone"], "America/New_York");
        assert_eq!(json["description"], "daily");
        assert!(json.get("location").is_none());
    }

    #[test]
    fn test_remote_event_deserializes_both_time_shapes() {
        let json = r#"{
            "id": "abc",
            "status": "confirmed",
            "summary": "Dentist",
            "start": {"dateTime": "2015-04-27T09:00:00-04:00", "timeZone": "America/New_York"},
            "end": {"date": "2015-04-28"},
            "htmlLink": "https://www.google.com/calendar/event?eid=abc"
        }"#;

        let event: RemoteEvent = serde_json::from_str(json).unwrap();

        assert!(!event.is_cancelled());
        let start = event.start.unwrap().date_time.unwrap();
        assert_eq!(start.naive_local(), at(2015, 4, 27, 9, 0, 0));
        assert_eq!(
            event.end.unwrap().date,
            Some(NaiveDate::from_ymd_opt(2015, 4, 28).unwrap())
        );
    }

    #[test]
    fn test_cancelled_instance_has_minimal_shape() {
        let event: RemoteEvent =
            serde_json::from_str(r#"{"id": "x_20150427", "status": "cancelled"}"#).unwrap();
        assert!(event.is_cancelled());
        assert!(event.start.is_none());
    }
}
