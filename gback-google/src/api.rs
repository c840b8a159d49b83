//! Google Calendar v3 REST calls.

use std::time::Duration;

use gback_core::{
    CalendarApi, CalendarDescriptor, GbackError, GbackResult, NewEvent, Page, RemoteEvent,
};
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

const API_BASE: &str = "https://www.googleapis.com/calendar/v3";
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// `CalendarApi` backed by the Google Calendar REST API.
#[derive(Debug, Clone)]
pub struct GoogleCalendarApi {
    http: reqwest::Client,
    access_token: String,
    base: Url,
}

impl GoogleCalendarApi {
    pub fn new(access_token: impl Into<String>) -> GbackResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("gback/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(transport)?;

        let base = Url::parse(API_BASE).map_err(|e| GbackError::Transport(e.to_string()))?;

        Ok(GoogleCalendarApi {
            http,
            access_token: access_token.into(),
            base,
        })
    }

    /// `base` followed by `segments`, each percent-encoded as one path segment.
    fn endpoint(&self, segments: &[&str]) -> GbackResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| GbackError::Transport(format!("Invalid API base: {}", self.base)))?
            .extend(segments);
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> GbackResult<T> {
        let response = request
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }

        response.json::<T>().await.map_err(transport)
    }
}

fn transport(err: reqwest::Error) -> GbackError {
    GbackError::Transport(err.to_string())
}

fn status_error(status: StatusCode, body: &str) -> GbackError {
    let detail = format!("{}: {}", status, body.trim());
    if status == StatusCode::UNAUTHORIZED {
        GbackError::Auth(detail)
    } else {
        GbackError::Transport(detail)
    }
}

fn events_query(page_token: Option<&str>) -> Vec<(&'static str, String)> {
    let mut query = vec![
        // expand recurring events into their instances
        ("singleEvents", "true".to_owned()),
        ("orderBy", "startTime".to_owned()),
    ];

    if let Some(token) = page_token {
        query.push(("pageToken", token.to_owned()));
    }

    query
}

impl CalendarApi for GoogleCalendarApi {
    async fn list_calendars(
        &self,
        page_token: Option<&str>,
    ) -> GbackResult<Page<CalendarDescriptor>> {
        let url = self.endpoint(&["users", "me", "calendarList"])?;
        let mut request = self.http.get(url);
        if let Some(token) = page_token {
            request = request.query(&[("pageToken", token)]);
        }

        debug!(page_token, "listing calendars");
        self.send(request).await
    }

    async fn list_events(
        &self,
        calendar_id: &str,
        page_token: Option<&str>,
    ) -> GbackResult<Page<RemoteEvent>> {
        let url = self.endpoint(&["calendars", calendar_id, "events"])?;
        let request = self.http.get(url).query(&events_query(page_token));

        debug!(calendar_id, page_token, "listing events");
        self.send(request).await
    }

    async fn insert_event(&self, calendar_id: &str, event: &NewEvent) -> GbackResult<RemoteEvent> {
        let url = self.endpoint(&["calendars", calendar_id, "events"])?;
        let request = self.http.post(url).json(event);

        debug!(calendar_id, summary = %event.summary, "inserting event");
        self.send(request).await
    }
}
