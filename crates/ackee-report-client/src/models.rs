//! Wire models for Ackee API payloads.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// A domain as listed by the `domains` query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainRef {
    /// Domain id.
    pub id: String,
    /// Display title.
    pub title: String,
}

/// One entry of a sorted statistics list.
///
/// `id` is the aliased `value` field and is kept exactly as the API sent it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatEntry {
    /// The label (page URL, referrer, browser, date, ...).
    #[serde(default)]
    pub id: Value,
    /// Number of occurrences.
    pub count: u64,
}

impl StatEntry {
    /// Create an entry.
    pub fn new(id: impl Into<Value>, count: u64) -> Self {
        Self {
            id: id.into(),
            count,
        }
    }
}

/// A `{ count }` average.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Average {
    /// The averaged value. Durations are in milliseconds.
    pub count: f64,
}

/// Precomputed metrics of a domain.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Facts {
    /// Average daily views.
    pub average_views: Average,
    /// Average visit duration in milliseconds.
    pub average_duration: Average,
    /// Views this month.
    pub views_month: u64,
    /// Views this year.
    pub views_year: u64,
    /// Views today.
    pub views_today: u64,
}

/// Per-domain breakdowns, each sorted and limited by the API.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Statistics {
    /// Daily unique views.
    pub views: Vec<StatEntry>,
    pub pages: Vec<StatEntry>,
    pub referrers: Vec<StatEntry>,
    pub languages: Vec<StatEntry>,
    pub browsers: Vec<StatEntry>,
    pub devices: Vec<StatEntry>,
    pub sizes: Vec<StatEntry>,
    pub systems: Vec<StatEntry>,
}

/// Full statistics of one domain as returned by the `domain` query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainData {
    pub id: String,
    pub title: String,
    pub facts: Facts,
    #[serde(default)]
    pub statistics: Statistics,
}

/// One entry of an event list.
///
/// Average lists carry fractional counts, so `count` keeps the number the
/// API sent, integer or not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEntry {
    #[serde(default)]
    pub id: Value,
    pub count: Number,
}

impl EventEntry {
    /// Create an entry.
    pub fn new(id: impl Into<Value>, count: impl Into<Number>) -> Self {
        Self {
            id: id.into(),
            count: count.into(),
        }
    }
}

/// Statistics of one event.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EventStatistics {
    /// Top values of the event.
    #[serde(default)]
    pub list: Vec<EventEntry>,
}

/// An event as returned by the `events` query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventData {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub statistics: EventStatistics,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TokenPayload {
    pub id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreatedToken {
    pub payload: Option<TokenPayload>,
}

impl CreatedToken {
    /// The issued token id, if the payload carried one.
    pub(crate) fn into_token(self) -> Option<String> {
        self.payload.and_then(|payload| payload.id)
    }
}
