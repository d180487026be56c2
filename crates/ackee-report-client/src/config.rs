//! Connection configuration and per-invocation query options.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;

/// How to reach and authenticate against an Ackee server.
///
/// Either `token` is set, or both `username` and `password` are. This is
/// checked when authenticating, not here.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the Ackee server.
    #[serde(alias = "server")]
    pub server_url: String,
    /// Username for token issuance.
    #[serde(default)]
    pub username: Option<String>,
    /// Password for token issuance.
    #[serde(default)]
    pub password: Option<String>,
    /// A pre-issued permanent token, used instead of username/password.
    #[serde(default)]
    pub token: Option<String>,
}

impl ClientConfig {
    /// Configuration authenticating with a pre-issued token.
    pub fn with_token(server_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            token: Some(token.into()),
            ..Default::default()
        }
    }

    /// Configuration authenticating with username and password.
    pub fn with_credentials(
        server_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            server_url: server_url.into(),
            username: Some(username.into()),
            password: Some(password.into()),
            token: None,
        }
    }

    /// Username and password, when both are present.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(username), Some(password)) => Some((username, password)),
            _ => None,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("server_url", &self.server_url)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Time window for a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeSpec {
    /// Length of the daily view series.
    pub days: u32,
    /// Range filter forwarded verbatim as the `$range` variable.
    pub input: Value,
}

impl RangeSpec {
    /// Create a range from a day count and an API range value.
    pub fn new(days: u32, input: impl Into<Value>) -> Self {
        Self {
            days,
            input: input.into(),
        }
    }
}

impl Default for RangeSpec {
    fn default() -> Self {
        RangePreset::default().spec()
    }
}

/// The `Range` values the Ackee API accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RangePreset {
    /// Last 24 hours.
    #[serde(rename = "LAST_24_HOURS")]
    Last24Hours,
    /// Last 7 days.
    #[default]
    #[serde(rename = "LAST_7_DAYS")]
    Last7Days,
    /// Last 30 days.
    #[serde(rename = "LAST_30_DAYS")]
    Last30Days,
    /// Last 6 months.
    #[serde(rename = "LAST_6_MONTHS")]
    Last6Months,
}

impl RangePreset {
    /// The API enum literal for this range.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Last24Hours => "LAST_24_HOURS",
            Self::Last7Days => "LAST_7_DAYS",
            Self::Last30Days => "LAST_30_DAYS",
            Self::Last6Months => "LAST_6_MONTHS",
        }
    }

    /// Number of daily view points covering this range.
    pub fn days(&self) -> u32 {
        match self {
            Self::Last24Hours => 1,
            Self::Last7Days => 7,
            Self::Last30Days => 30,
            Self::Last6Months => 180,
        }
    }

    /// The range specification for this preset.
    pub fn spec(&self) -> RangeSpec {
        RangeSpec::new(self.days(), self.as_str())
    }
}

impl fmt::Display for RangePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RangePreset {
    type Err = ApiError;

    /// Parse an API range literal, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            Self::Last24Hours,
            Self::Last7Days,
            Self::Last30Days,
            Self::Last6Months,
        ]
        .into_iter()
        .find(|preset| preset.as_str().eq_ignore_ascii_case(s))
        .ok_or_else(|| ApiError::InvalidOption(format!("unknown range '{s}'")))
    }
}

/// Which report to build.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ReportKind {
    /// Domain statistics only.
    #[default]
    Summary,
    /// Domain statistics plus the statistics of every event.
    WithEvents {
        /// Event list type, inserted into the query as an enum literal.
        event_type: String,
    },
}

impl ReportKind {
    /// A report including events of the given list type.
    pub fn with_events(event_type: impl Into<String>) -> Self {
        Self::WithEvents {
            event_type: event_type.into(),
        }
    }

    /// Whether event statistics are requested.
    pub fn includes_events(&self) -> bool {
        matches!(self, Self::WithEvents { .. })
    }
}

/// Options shared by every query of one client.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOptions {
    /// Time window.
    pub range: RangeSpec,
    /// Entries per statistics list.
    pub limit: u32,
    /// Report shape.
    pub kind: ReportKind,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            range: RangeSpec::default(),
            limit: 10,
            kind: ReportKind::Summary,
        }
    }
}

impl QueryOptions {
    /// Options with the given range and limit and no events.
    pub fn new(range: RangeSpec, limit: u32) -> Self {
        Self {
            range,
            limit,
            kind: ReportKind::Summary,
        }
    }

    /// Set the report kind.
    pub fn kind(mut self, kind: ReportKind) -> Self {
        self.kind = kind;
        self
    }
}
