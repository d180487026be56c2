//! The Ackee analytics client.

use futures_util::future::try_join_all;

use crate::config::{ClientConfig, QueryOptions, ReportKind};
use crate::error::{ApiError, AuthError, Result};
use crate::graphql::{GraphQLClient, GraphQLClientBuilder, response};
use crate::models::{CreatedToken, DomainData, DomainRef, EventData};
use crate::queries;
use crate::report::{self, AggregateReport, EventSummary};

/// Relative path of the GraphQL endpoint below the server URL.
const API_PATH: &str = "api";

/// Client for one Ackee server and one set of query options.
///
/// # Example
///
/// ```ignore
/// use ackee_report_client::{AnalyticsClient, ClientConfig, QueryOptions, RangePreset};
///
/// let config = ClientConfig::with_credentials("https://ackee.example.com", "admin", "secret");
/// let options = QueryOptions::new(RangePreset::Last30Days.spec(), 5);
///
/// let client = AnalyticsClient::with_options(config, options)?;
/// client.authenticate().await?;
///
/// let ids: Vec<String> = client.list_domains().await?.into_iter().map(|d| d.id).collect();
/// let report = client.get_summary(&ids).await?;
/// println!("{} views in range", report.views_in_range);
/// ```
#[derive(Debug, Clone)]
pub struct AnalyticsClient {
    config: ClientConfig,
    options: QueryOptions,
    endpoint: String,
    graphql: GraphQLClient,
}

impl AnalyticsClient {
    /// Create a client with default query options.
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::with_options(config, QueryOptions::default())
    }

    /// Create a client with the given query options.
    pub fn with_options(config: ClientConfig, options: QueryOptions) -> Result<Self> {
        Self::from_builder(config, options, |builder| builder)
    }

    /// Create a client, customizing the underlying GraphQL client.
    ///
    /// Use this to add a request timeout or extra headers.
    pub fn from_builder(
        config: ClientConfig,
        options: QueryOptions,
        customize: impl FnOnce(GraphQLClientBuilder) -> GraphQLClientBuilder,
    ) -> Result<Self> {
        let endpoint = normalize_endpoint(&config.server_url);
        let graphql = customize(GraphQLClient::builder(format!("{endpoint}{API_PATH}"))).build()?;

        Ok(Self {
            config,
            options,
            endpoint,
            graphql,
        })
    }

    /// The server URL with a trailing slash.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// The query options used by this client.
    pub fn options(&self) -> &QueryOptions {
        &self.options
    }

    /// The bearer token currently in use.
    pub fn bearer_token(&self) -> Option<String> {
        self.graphql.bearer_token()
    }

    /// Obtain a bearer token for all subsequent requests.
    ///
    /// A configured token is used as is, without contacting the server.
    /// Otherwise a token is issued for the configured username and password.
    pub async fn authenticate(&self) -> Result<()> {
        if let Some(token) = &self.config.token {
            tracing::debug!(target: "ackee_report_client", "using configured token");
            self.graphql.set_bearer_token(token.clone());
            return Ok(());
        }

        let request = queries::create_token_for(&self.config).ok_or(AuthError::MissingCredentials)?;
        tracing::debug!(target: "ackee_report_client", "requesting token for configured credentials");

        let data = self.graphql.execute(request).await.map_err(AuthError::Request)?;
        let token = response::field::<CreatedToken>(data, "createToken")
            .ok()
            .and_then(CreatedToken::into_token)
            .ok_or(AuthError::MissingToken)?;

        self.graphql.set_bearer_token(token);
        Ok(())
    }

    /// List every domain, in the order the API returns them.
    pub async fn list_domains(&self) -> Result<Vec<DomainRef>> {
        let data = self.graphql.execute(queries::domains()).await?;
        Ok(response::field(data, "domains")?)
    }

    /// Build the aggregate report for the given domains.
    ///
    /// Domains are fetched concurrently; the report keeps the order of
    /// `domain_ids`. The first failing request fails the whole call. An
    /// invalid event type fails before any request is sent.
    pub async fn get_summary<S: AsRef<str>>(&self, domain_ids: &[S]) -> Result<AggregateReport> {
        if let ReportKind::WithEvents { event_type } = &self.options.kind {
            queries::check_event_type(event_type)?;
        }

        tracing::debug!(
            target: "ackee_report_client",
            domains = domain_ids.len(),
            "fetching domain statistics"
        );

        // Spawned tasks keep running when a sibling fails; only the result is dropped.
        let handles: Vec<_> = domain_ids
            .iter()
            .map(|id| tokio::spawn(self.fetch_domain(id.as_ref())))
            .collect();

        let data = try_join_all(handles.into_iter().map(|handle| async move {
            handle
                .await
                .map_err(|e| ApiError::Transport(format!("domain request task failed: {e}")))?
        }))
        .await?;

        let events = match &self.options.kind {
            ReportKind::Summary => None,
            ReportKind::WithEvents { event_type } => Some(
                self.fetch_events(event_type)
                    .await?
                    .into_iter()
                    .map(EventSummary::from)
                    .collect(),
            ),
        };

        Ok(report::aggregate(data, self.options.range.clone(), events))
    }

    /// Statistics of one domain.
    ///
    /// The returned future borrows nothing from `self`, so it can run on its
    /// own task.
    fn fetch_domain(
        &self,
        id: &str,
    ) -> impl Future<Output = std::result::Result<DomainData, ApiError>> + Send + use<> {
        let graphql = self.graphql.clone();
        let request = queries::domain(id, &self.options.range, self.options.limit);
        let id = id.to_string();

        async move {
            tracing::debug!(target: "ackee_report_client", domain = %id, "fetching domain");
            let data = graphql.execute(request).await?;
            let domain: Option<DomainData> = response::field(data, "domain")?;
            let domain = domain
                .ok_or_else(|| ApiError::InvalidResponse(format!("domain '{id}' not found")))?;
            tracing::debug!(target: "ackee_report_client", domain = %id, "fetched domain");
            Ok(domain)
        }
    }

    /// Statistics of every event.
    async fn fetch_events(&self, event_type: &str) -> std::result::Result<Vec<EventData>, ApiError> {
        let request = queries::events(event_type, &self.options.range, self.options.limit)?;
        tracing::debug!(target: "ackee_report_client", event_type, "fetching events");
        let data = self.graphql.execute(request).await?;
        response::field(data, "events")
    }
}

/// Append a trailing `/` unless present.
fn normalize_endpoint(server: &str) -> String {
    if server.ends_with('/') {
        server.to_string()
    } else {
        format!("{server}/")
    }
}
