//! Remote calendar descriptors and paginated listings.

use serde::{Deserialize, Serialize};

/// A calendar as listed by the remote calendar list.
///
/// `summary` is the display name. The remote service does not enforce
/// uniqueness, so two descriptors may share one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDescriptor {
    pub id: String,
    pub summary: String,
    pub time_zone: String,
}

impl CalendarDescriptor {
    pub fn new(
        id: impl Into<String>,
        summary: impl Into<String>,
        time_zone: impl Into<String>,
    ) -> Self {
        CalendarDescriptor {
            id: id.into(),
            summary: summary.into(),
            time_zone: time_zone.into(),
        }
    }
}

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

impl<T> Page<T> {
    pub fn last(items: Vec<T>) -> Self {
        Page {
            items,
            next_page_token: None,
        }
    }

    /// Continuation token for the next page, if there is one.
    ///
    /// An empty token ends the listing just like a missing one.
    pub fn continuation(&self) -> Option<&str> {
        self.next_page_token.as_deref().filter(|t| !t.is_empty())
    }
}
