//! iCalendar export.

use icalendar::{Calendar, Component, EventLike, Property, ValueType};

use crate::calendar::CalendarDescriptor;
use crate::event::{EventDateTime, RemoteEvent};

const PRODID: &str = "PRODID:-//gback//gback//EN";

/// Build one VCALENDAR holding a VEVENT per non-cancelled event.
pub fn events_to_ics<'a>(
    calendar: &CalendarDescriptor,
    events: impl IntoIterator<Item = &'a RemoteEvent>,
) -> String {
    let mut cal = Calendar::new();
    cal.name(&calendar.summary);
    cal.timezone(calendar.time_zone.as_str());

    for event in events.into_iter().filter(|e| !e.is_cancelled()) {
        cal.push(to_ics_event(event));
    }

    tidy(&cal.done().to_string())
}

fn to_ics_event(event: &RemoteEvent) -> icalendar::Event {
    let mut ics_event = icalendar::Event::new();

    if let Some(ref id) = event.id {
        ics_event.uid(id);
    }

    if let Some(ref start) = event.start {
        add_datetime_property(&mut ics_event, "DTSTART", start);
    }
    if let Some(ref end) = event.end {
        add_datetime_property(&mut ics_event, "DTEND", end);
    }

    if let Some(ref summary) = event.summary {
        ics_event.summary(summary);
    }
    if let Some(ref location) = event.location {
        ics_event.location(location);
    }
    if let Some(ref description) = event.description {
        ics_event.description(description);
    }

    ics_event.done()
}

/// Timed values keep the wall clock of their own offset and are written
/// floating; whole-day values get `VALUE=DATE`.
fn add_datetime_property(ics_event: &mut icalendar::Event, name: &str, time: &EventDateTime) {
    if let Some(dt) = time.date_time {
        ics_event.add_property(name, dt.format("%Y%m%dT%H%M%S").to_string());
    } else if let Some(d) = time.date {
        let mut prop = Property::new(name, d.format("%Y%m%d").to_string());
        prop.append_parameter(ValueType::Date);
        ics_event.append_property(prop);
    }
}

/// Replace the icalendar crate's PRODID and drop CALSCALE:GREGORIAN (the default).
fn tidy(ics: &str) -> String {
    let mut result = String::with_capacity(ics.len());

    for line in ics.lines() {
        if line.starts_with("PRODID:") {
            result.push_str(PRODID);
            result.push_str("\r\n");
            continue;
        }

        if line == "CALSCALE:GREGORIAN" {
            continue;
        }

        result.push_str(line);
        result.push_str("\r\n");
    }

    result
}
