//! Client for the Ackee analytics GraphQL API.
//!
//! This crate authenticates against an Ackee server, runs its fixed domain and
//! event queries, and folds the results into summary reports:
//!
//! - **Authentication**: pre-issued token, or a token issued for a
//!   username/password pair
//! - **Domains**: the list of tracked domains
//! - **Summary**: per-domain facts and statistics merged into an
//!   [`AggregateReport`], optionally with event statistics
//!
//! # Example
//!
//! ```ignore
//! use ackee_report_client::{AnalyticsClient, ClientConfig, QueryOptions, RangePreset, ReportKind};
//!
//! let config = ClientConfig::with_token("https://ackee.example.com", "my-token");
//! let options = QueryOptions::new(RangePreset::Last7Days.spec(), 10)
//!     .kind(ReportKind::with_events("TOTAL"));
//!
//! let client = AnalyticsClient::with_options(config, options)?;
//! client.authenticate().await?;
//!
//! let report = client.get_summary(&["domain-id-1", "domain-id-2"]).await?;
//! println!("{}: {} views today", report.names_short, report.views_day);
//! ```
//!
//! # Errors
//!
//! Every operation returns [`Error`]: [`AuthError`] from [`AnalyticsClient::authenticate`],
//! [`ApiError`] from everything that talks to the API. Nothing is retried.
//!
//! # Logging
//!
//! The crate emits [`tracing`] events under the `ackee_report_client` target
//! and never installs a subscriber.

mod client;
mod config;
mod error;
pub mod graphql;
pub mod models;
pub mod queries;
pub mod report;

pub use client::AnalyticsClient;
pub use config::{ClientConfig, QueryOptions, RangePreset, RangeSpec, ReportKind};
pub use error::{ApiError, AuthError, Error, Result};
pub use models::{DomainRef, EventEntry, StatEntry};
pub use report::{AggregateReport, DomainSummary, EventSummary};
