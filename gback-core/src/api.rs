//! The remote calendar service as seen by a `Session`.

use crate::calendar::{CalendarDescriptor, Page};
use crate::error::GbackResult;
use crate::event::{NewEvent, RemoteEvent};

/// The three remote calls gback makes.
///
/// Implementations perform each call exactly once; they never retry.
/// A `page_token` of `None` requests the first page.
#[allow(async_fn_in_trait)]
pub trait CalendarApi {
    async fn list_calendars(&self, page_token: Option<&str>)
    -> GbackResult<Page<CalendarDescriptor>>;

    /// Events of one calendar ordered by start time, with recurring events
    /// expanded into single instances.
    async fn list_events(
        &self,
        calendar_id: &str,
        page_token: Option<&str>,
    ) -> GbackResult<Page<RemoteEvent>>;

    async fn insert_event(&self, calendar_id: &str, event: &NewEvent) -> GbackResult<RemoteEvent>;
}

impl<A: CalendarApi> CalendarApi for &A {
    async fn list_calendars(
        &self,
        page_token: Option<&str>,
    ) -> GbackResult<Page<CalendarDescriptor>> {
        (**self).list_calendars(page_token).await
    }

    async fn list_events(
        &self,
        calendar_id: &str,
        page_token: Option<&str>,
    ) -> GbackResult<Page<RemoteEvent>> {
        (**self).list_events(calendar_id, page_token).await
    }

    async fn insert_event(&self, calendar_id: &str, event: &NewEvent) -> GbackResult<RemoteEvent> {
        (**self).insert_event(calendar_id, event).await
    }
}
