//! In-memory `CalendarApi` for tests.

use std::cell::{Cell, RefCell};

use crate::api::CalendarApi;
use crate::calendar::{CalendarDescriptor, Page};
use crate::error::{GbackError, GbackResult};
use crate::event::{NewEvent, RemoteEvent};

/// Serves canned pages and records every call made against it.
#[derive(Default)]
pub struct StubApi {
    calendar_pages: Vec<Vec<CalendarDescriptor>>,
    event_pages: Vec<Vec<RemoteEvent>>,
    failing_calendar_page: Option<usize>,
    failing_event_page: Option<usize>,
    calendar_list_calls: Cell<usize>,
    event_calendar_ids: RefCell<Vec<String>>,
    inserted: RefCell<Vec<(String, NewEvent)>>,
}

impl StubApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_calendar_pages(mut self, pages: Vec<Vec<CalendarDescriptor>>) -> Self {
        self.calendar_pages = pages;
        self
    }

    pub fn with_event_pages(mut self, pages: Vec<Vec<RemoteEvent>>) -> Self {
        self.event_pages = pages;
        self
    }

    /// Make the request for page `index` (zero-based) of the calendar list fail.
    pub fn fail_calendar_page(mut self, index: usize) -> Self {
        self.failing_calendar_page = Some(index);
        self
    }

    /// Make the request for page `index` (zero-based) of the event listing fail.
    pub fn fail_event_page(mut self, index: usize) -> Self {
        self.failing_event_page = Some(index);
        self
    }

    pub fn calendar_list_calls(&self) -> usize {
        self.calendar_list_calls.get()
    }

    pub fn event_list_calls(&self) -> usize {
        self.event_calendar_ids.borrow().len()
    }

    /// Calendar id passed to each events listing call, in call order.
    pub fn event_calendar_ids(&self) -> Vec<String> {
        self.event_calendar_ids.borrow().clone()
    }

    /// `(calendar_id, body)` of each insert call, in call order.
    pub fn inserted(&self) -> Vec<(String, NewEvent)> {
        self.inserted.borrow().clone()
    }
}

fn page_index(page_token: Option<&str>) -> GbackResult<usize> {
    match page_token {
        None => Ok(0),
        Some(token) => token
            .strip_prefix("page-")
            .and_then(|n| n.parse().ok())
            .ok_or_else(|| GbackError::Transport(format!("Invalid page token: {}", token))),
    }
}

fn serve<T: Clone>(
    pages: &[Vec<T>],
    page_token: Option<&str>,
    failing: Option<usize>,
) -> GbackResult<Page<T>> {
    let index = page_index(page_token)?;

    if failing == Some(index) {
        return Err(GbackError::Transport(format!(
            "503 Service Unavailable (page {})",
            index
        )));
    }

    if pages.is_empty() && index == 0 {
        return Ok(Page::last(Vec::new()));
    }

    let items = pages
        .get(index)
        .cloned()
        .ok_or_else(|| GbackError::Transport(format!("No page {}", index)))?;

    let next_page_token = (index + 1 < pages.len()).then(|| format!("page-{}", index + 1));

    Ok(Page {
        items,
        next_page_token,
    })
}

impl CalendarApi for StubApi {
    async fn list_calendars(
        &self,
        page_token: Option<&str>,
    ) -> GbackResult<Page<CalendarDescriptor>> {
        self.calendar_list_calls.set(self.calendar_list_calls.get() + 1);
        serve(&self.calendar_pages, page_token, self.failing_calendar_page)
    }

    async fn list_events(
        &self,
        calendar_id: &str,
        page_token: Option<&str>,
    ) -> GbackResult<Page<RemoteEvent>> {
        self.event_calendar_ids
            .borrow_mut()
            .push(calendar_id.to_string());
        serve(&self.event_pages, page_token, self.failing_event_page)
    }

    async fn insert_event(&self, calendar_id: &str, event: &NewEvent) -> GbackResult<RemoteEvent> {
        let mut inserted = self.inserted.borrow_mut();
        inserted.push((calendar_id.to_string(), event.clone()));

        Ok(RemoteEvent {
            id: Some(format!("evt{}", inserted.len())),
            status: Some("confirmed".to_string()),
            summary: Some(event.summary.clone()),
            html_link: Some(format!("https://calendar.example/event/{}", inserted.len())),
            ..Default::default()
        })
    }
}
