//! Core types for gback.
//!
//! This crate holds everything that does not talk to Google directly:
//! - `Session` and `CalendarView`, generic over the `CalendarApi` seam
//! - calendar and event types, including the insert body
//! - iCalendar export

pub mod api;
pub mod calendar;
pub mod error;
pub mod event;
pub mod ics;
pub mod session;

#[cfg(any(test, feature = "test-util"))]
pub mod stub;

pub use api::CalendarApi;
pub use calendar::{CalendarDescriptor, Page};
pub use error::{GbackError, GbackResult};
pub use event::{EventDraft, EventPoint, EventTiming, NewEvent, RemoteEvent};
pub use session::{CalendarView, Session};
