//! Report types and the aggregation of per-domain statistics.
//!
//! All report types serialize to camelCase JSON.

use serde::{Deserialize, Serialize};

use crate::config::RangeSpec;
use crate::models::{DomainData, EventData, EventEntry, StatEntry};

/// Summary of a single domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainSummary {
    pub id: String,
    pub title: String,
    /// Sum of the daily view series.
    pub views_in_range: u64,
    pub views_day: u64,
    pub views_month: u64,
    pub views_year: u64,
    /// Average daily views as reported by the API.
    pub views_avg: f64,
    /// Average visit duration in whole seconds.
    pub duration_avg: u64,
    pub pages: Vec<StatEntry>,
    pub referrers: Vec<StatEntry>,
    pub languages: Vec<StatEntry>,
    pub browsers: Vec<StatEntry>,
    pub devices: Vec<StatEntry>,
    pub sizes: Vec<StatEntry>,
    pub systems: Vec<StatEntry>,
}

impl From<DomainData> for DomainSummary {
    fn from(domain: DomainData) -> Self {
        let facts = domain.facts;
        let statistics = domain.statistics;

        Self {
            id: domain.id,
            title: domain.title,
            views_in_range: statistics.views.iter().map(|view| view.count).sum(),
            views_day: facts.views_today,
            views_month: facts.views_month,
            views_year: facts.views_year,
            views_avg: facts.average_views.count,
            duration_avg: millis_to_seconds(facts.average_duration.count),
            pages: statistics.pages,
            referrers: statistics.referrers,
            languages: statistics.languages,
            browsers: statistics.browsers,
            devices: statistics.devices,
            sizes: statistics.sizes,
            systems: statistics.systems,
        }
    }
}

/// Top values of one event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventSummary {
    pub id: String,
    pub title: String,
    /// The event list exactly as the API returned it.
    pub data: Vec<EventEntry>,
}

impl From<EventData> for EventSummary {
    fn from(event: EventData) -> Self {
        Self {
            id: event.id,
            title: event.title,
            data: event.statistics.list,
        }
    }
}

/// Combined statistics of several domains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateReport {
    /// Every title, comma separated.
    pub names: String,
    /// At most two titles, then `and N more`.
    pub names_short: String,
    pub views_in_range: u64,
    pub views_day: u64,
    pub views_month: u64,
    pub views_year: u64,
    /// Mean of the domains' average views, rounded to one decimal.
    ///
    /// NaN (serialized as `null`) when the report has no domains.
    pub views_avg: f64,
    /// Mean visit duration in seconds over domains with a positive average.
    ///
    /// `None` when no domain has one.
    pub duration_avg: Option<u64>,
    pub range: RangeSpec,
    /// Present only for reports that asked for events.
    pub events: Option<Vec<EventSummary>>,
    pub domains: Vec<DomainSummary>,
}

/// Reduce per-domain statistics into one report.
///
/// Domain order is kept as given.
pub fn aggregate(
    data: Vec<DomainData>,
    range: RangeSpec,
    events: Option<Vec<EventSummary>>,
) -> AggregateReport {
    let duration_avg = average_duration(&data);

    let titles: Vec<&str> = data.iter().map(|domain| domain.title.as_str()).collect();
    let names = titles.join(", ");
    let names_short = short_names(&titles);

    let domains: Vec<DomainSummary> = data.into_iter().map(DomainSummary::from).collect();

    let views_avg = domains.iter().map(|domain| domain.views_avg).sum::<f64>() / domains.len() as f64;

    AggregateReport {
        names,
        names_short,
        views_in_range: domains.iter().map(|domain| domain.views_in_range).sum(),
        views_day: domains.iter().map(|domain| domain.views_day).sum(),
        views_month: domains.iter().map(|domain| domain.views_month).sum(),
        views_year: domains.iter().map(|domain| domain.views_year).sum(),
        views_avg: (views_avg * 10.0).round() / 10.0,
        duration_avg,
        range,
        events,
        domains,
    }
}

/// Titles joined with `", "`, shortened to two titles plus a count.
pub fn short_names(titles: &[&str]) -> String {
    if titles.len() > 2 {
        format!("{} and {} more", titles[..2].join(", "), titles.len() - 2)
    } else {
        titles.join(", ")
    }
}

/// Mean average duration in seconds, ignoring domains without visits.
fn average_duration(data: &[DomainData]) -> Option<u64> {
    let positive: Vec<f64> = data
        .iter()
        .map(|domain| domain.facts.average_duration.count)
        .filter(|count| *count > 0.0)
        .collect();

    if positive.is_empty() {
        return None;
    }

    let mean = positive.iter().sum::<f64>() / positive.len() as f64;
    Some(millis_to_seconds(mean))
}

fn millis_to_seconds(millis: f64) -> u64 {
    (millis / 1000.0).round().max(0.0) as u64
}
