//! Calendar directory and per-calendar operations.

use tracing::debug;

use crate::api::CalendarApi;
use crate::calendar::CalendarDescriptor;
use crate::error::{GbackError, GbackResult};
use crate::event::{EventDraft, RemoteEvent};
use crate::ics;

/// An authenticated connection plus the calendar list fetched when it was
/// opened. The list is never refreshed; open a new session for fresh data.
pub struct Session<A> {
    api: A,
    calendars: Vec<CalendarDescriptor>,
}

impl<A: CalendarApi> Session<A> {
    pub async fn new(api: A) -> GbackResult<Self> {
        let calendars = cache_all_calendars(&api).await?;
        Ok(Session { api, calendars })
    }

    pub fn calendars(&self) -> &[CalendarDescriptor] {
        &self.calendars
    }

    pub fn calendar_names(&self) -> Vec<&str> {
        self.calendars.iter().map(|c| c.summary.as_str()).collect()
    }

    /// Look up a calendar by display name. The first match in list order
    /// wins when names repeat.
    pub fn resolve(&self, name: &str) -> GbackResult<CalendarView<'_, A>> {
        let calendar = self
            .calendars
            .iter()
            .find(|c| c.summary == name)
            .ok_or_else(|| GbackError::CalendarNotFound(name.to_string()))?;

        Ok(CalendarView {
            api: &self.api,
            calendar,
        })
    }
}

async fn cache_all_calendars<A: CalendarApi>(api: &A) -> GbackResult<Vec<CalendarDescriptor>> {
    let mut calendars = Vec::new();
    let mut page_token: Option<String> = None;

    loop {
        let page = api.list_calendars(page_token.as_deref()).await?;
        debug!(count = page.items.len(), "fetched calendar list page");

        page_token = page.continuation().map(str::to_string);
        calendars.extend(page.items);

        if page_token.is_none() {
            break;
        }
    }

    Ok(calendars)
}

/// One resolved calendar.
pub struct CalendarView<'a, A> {
    api: &'a A,
    calendar: &'a CalendarDescriptor,
}

impl<A: CalendarApi> CalendarView<'_, A> {
    pub fn calendar(&self) -> &CalendarDescriptor {
        self.calendar
    }

    /// Export every non-cancelled event as an iCalendar document.
    ///
    /// Nothing is returned unless every page was fetched.
    pub async fn list_events(&self) -> GbackResult<String> {
        let mut events: Vec<RemoteEvent> = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let page = self
                .api
                .list_events(&self.calendar.id, page_token.as_deref())
                .await?;
            debug!(
                calendar = %self.calendar.summary,
                count = page.items.len(),
                "fetched events page"
            );

            page_token = page.continuation().map(str::to_string);
            events.extend(page.items);

            if page_token.is_none() {
                break;
            }
        }

        Ok(ics::events_to_ics(self.calendar, &events))
    }

    /// Insert one event and return the link to it.
    ///
    /// Every call creates a new remote event.
    pub async fn add_event(&self, draft: &EventDraft) -> GbackResult<String> {
        let body = draft.to_new_event(&self.calendar.time_zone);
        let created = self.api.insert_event(&self.calendar.id, &body).await?;

        created.html_link.ok_or_else(|| {
            GbackError::Transport("Insert response did not include an event link".to_string())
        })
    }
}
