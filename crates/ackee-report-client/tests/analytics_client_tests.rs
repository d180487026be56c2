//! Integration tests for the Ackee client against a mocked API.

use std::time::Duration;

use ackee_report_client::{
    AnalyticsClient, ApiError, AuthError, ClientConfig, Error, QueryOptions, RangeSpec,
    ReportKind,
};
use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn domain_response(id: &str, title: &str, views: &[u64], duration_ms: u64) -> Value {
    let views: Vec<Value> = views
        .iter()
        .enumerate()
        .map(|(day, count)| json!({"count": count, "id": format!("2024-01-0{}", day + 1)}))
        .collect();

    json!({
        "data": {
            "domain": {
                "id": id,
                "title": title,
                "facts": {
                    "averageViews": {"count": 4},
                    "averageDuration": {"count": duration_ms},
                    "viewsMonth": 120,
                    "viewsYear": 1400,
                    "viewsToday": 6
                },
                "statistics": {
                    "views": views,
                    "pages": [{"count": 9, "id": format!("https://{id}.example/")}],
                    "referrers": [{"count": 2, "id": "https://search.example/"}],
                    "languages": [{"count": 5, "id": "en"}],
                    "browsers": [{"count": 4, "id": "Firefox 120"}],
                    "devices": [{"count": 3, "id": "Desktop"}],
                    "sizes": [{"count": 3, "id": "1920px x 1080px"}],
                    "systems": [{"count": 3, "id": "Linux"}]
                }
            }
        }
    })
}

async fn mount_domain(server: &MockServer, id: &str, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/api"))
        .and(body_string_contains("getDomain("))
        .and(body_partial_json(json!({"variables": {"id": id}})))
        .respond_with(response)
        .mount(server)
        .await;
}

fn token_client(server: &MockServer, options: QueryOptions) -> AnalyticsClient {
    AnalyticsClient::with_options(ClientConfig::with_token(server.uri(), "pre-issued"), options)
        .expect("Failed to build client")
}

#[tokio::test]
async fn test_configured_token_is_used_without_token_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("createToken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api"))
        .and(header("Authorization", "Bearer pre-issued"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"domains": []}})))
        .expect(1)
        .mount(&server)
        .await;

    let client = token_client(&server, QueryOptions::default());
    client.authenticate().await.expect("authenticate failed");
    assert_eq!(client.bearer_token().as_deref(), Some("pre-issued"));

    let domains = client.list_domains().await.expect("list_domains failed");
    assert!(domains.is_empty());
}

#[tokio::test]
async fn test_credentials_issue_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api"))
        .and(body_string_contains("createToken"))
        .and(body_partial_json(
            json!({"variables": {"input": {"username": "admin", "password": "secret"}}}),
        ))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": {"createToken": {"payload": {"id": "T"}}}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api"))
        .and(body_string_contains("getDomains"))
        .and(header("Authorization", "Bearer T"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"domains": []}})))
        .expect(1)
        .mount(&server)
        .await;

    // No trailing slash: the client adds one before appending `api`.
    let config = ClientConfig::with_credentials(server.uri(), "admin", "secret");
    let client = AnalyticsClient::new(config).unwrap();

    client.authenticate().await.expect("authenticate failed");
    assert_eq!(client.bearer_token().as_deref(), Some("T"));
    client.list_domains().await.expect("list_domains failed");
}

#[tokio::test]
async fn test_token_response_without_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": {"createToken": {"payload": null}}})),
        )
        .mount(&server)
        .await;

    let config = ClientConfig::with_credentials(server.uri(), "admin", "secret");
    let client = AnalyticsClient::new(config).unwrap();

    let err = client.authenticate().await.unwrap_err();
    assert_eq!(err, Error::Auth(AuthError::MissingToken));
    assert!(client.bearer_token().is_none());
}

#[tokio::test]
async fn test_rejected_credentials() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": null,
            "errors": [{"message": "Username or password incorrect"}]
        })))
        .mount(&server)
        .await;

    let config = ClientConfig::with_credentials(server.uri(), "admin", "wrong");
    let client = AnalyticsClient::new(config).unwrap();

    let err = client.authenticate().await.unwrap_err();
    assert_eq!(
        err,
        Error::Auth(AuthError::Request(ApiError::GraphQL {
            message: "Username or password incorrect".into()
        }))
    );
}

#[tokio::test]
async fn test_list_domains_keeps_order() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api"))
        .and(body_string_contains("getDomains"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"domains": [
                {"id": "b", "title": "Shop"},
                {"id": "a", "title": "Blog"}
            ]}
        })))
        .mount(&server)
        .await;

    let client = token_client(&server, QueryOptions::default());
    client.authenticate().await.unwrap();

    let domains = client.list_domains().await.unwrap();
    let ids: Vec<&str> = domains.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "a"]);
    assert_eq!(domains[1].title, "Blog");
}

#[tokio::test]
async fn test_graphql_errors_fail_with_first_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [{"message": "Token invalid"}, {"message": "ignored"}]
        })))
        .mount(&server)
        .await;

    let client = token_client(&server, QueryOptions::default());
    let err = client.list_domains().await.unwrap_err();
    assert_eq!(
        err,
        Error::Api(ApiError::GraphQL {
            message: "Token invalid".into()
        })
    );
}

#[tokio::test]
async fn test_http_error_body_and_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"errors": [{"message": "Syntax Error"}]})),
        )
        .mount(&server)
        .await;

    let client = token_client(&server, QueryOptions::default());
    let err = client.list_domains().await.unwrap_err();
    assert_eq!(
        err.to_string(),
        r#"API error: {"errors":[{"message":"Syntax Error"}]} (400 status code)"#
    );
}

#[tokio::test]
async fn test_http_error_without_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = token_client(&server, QueryOptions::default());
    let err = client.list_domains().await.unwrap_err();
    assert!(matches!(err, Error::Api(ApiError::Transport(_))));
}

#[tokio::test]
async fn test_summary_of_three_domains() {
    let server = MockServer::start().await;
    mount_domain(
        &server,
        "a",
        ResponseTemplate::new(200).set_body_json(domain_response("a", "X", &[3, 7], 2000)),
    )
    .await;
    mount_domain(
        &server,
        "b",
        ResponseTemplate::new(200).set_body_json(domain_response("b", "Y", &[1], 0)),
    )
    .await;
    mount_domain(
        &server,
        "c",
        ResponseTemplate::new(200).set_body_json(domain_response("c", "Z", &[], 4000)),
    )
    .await;

    let client = token_client(&server, QueryOptions::new(RangeSpec::new(2, "LAST_7_DAYS"), 5));
    client.authenticate().await.unwrap();

    let report = client.get_summary(&["a", "b", "c"]).await.expect("get_summary failed");

    assert_eq!(report.names, "X, Y, Z");
    assert_eq!(report.names_short, "X, Y and 1 more");
    assert_eq!(report.domains[0].views_in_range, 10);
    assert_eq!(report.views_in_range, 11);
    assert_eq!(report.views_day, 18);
    assert_eq!(report.views_month, 360);
    assert_eq!(report.views_year, 4200);
    assert_eq!(report.views_avg, 4.0);
    // (2000 + 4000) / 2 = 3000ms
    assert_eq!(report.duration_avg, Some(3));
    assert_eq!(report.range, RangeSpec::new(2, "LAST_7_DAYS"));
    assert!(report.events.is_none());
    assert_eq!(report.domains[2].pages[0].id, "https://c.example/");
}

#[tokio::test]
async fn test_summary_keeps_input_order() {
    let server = MockServer::start().await;
    mount_domain(
        &server,
        "slow",
        ResponseTemplate::new(200)
            .set_body_json(domain_response("slow", "Slow", &[1], 1000))
            .set_delay(Duration::from_millis(300)),
    )
    .await;
    mount_domain(
        &server,
        "fast",
        ResponseTemplate::new(200).set_body_json(domain_response("fast", "Fast", &[1], 1000)),
    )
    .await;

    let client = token_client(&server, QueryOptions::default());
    let report = client.get_summary(&["slow", "fast"]).await.unwrap();

    let ids: Vec<&str> = report.domains.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec!["slow", "fast"]);
    assert_eq!(report.names_short, "Slow, Fast");
}

#[tokio::test]
async fn test_failing_domain_fails_summary() {
    let server = MockServer::start().await;
    mount_domain(
        &server,
        "a",
        ResponseTemplate::new(200).set_body_json(domain_response("a", "X", &[1], 1000)),
    )
    .await;
    mount_domain(
        &server,
        "b",
        ResponseTemplate::new(500).set_body_json(json!({"error": "boom"})),
    )
    .await;

    let client = token_client(&server, QueryOptions::default());
    let err = client.get_summary(&["a", "b"]).await.unwrap_err();
    assert!(matches!(err.as_api(), Some(ApiError::HttpStatus { status: 500, .. })));

    assert_eq!(
        err,
        Error::Api(ApiError::HttpStatus {
            status: 500,
            body: r#"{"error":"boom"}"#.into()
        })
    );
}

#[tokio::test]
async fn test_unknown_domain_fails_summary() {
    let server = MockServer::start().await;
    mount_domain(
        &server,
        "gone",
        ResponseTemplate::new(200).set_body_json(json!({"data": {"domain": null}})),
    )
    .await;

    let client = token_client(&server, QueryOptions::default());
    let err = client.get_summary(&["gone"]).await.unwrap_err();
    assert!(matches!(err, Error::Api(ApiError::InvalidResponse(msg)) if msg.contains("gone")));
}

#[tokio::test]
async fn test_summary_with_events() {
    let server = MockServer::start().await;
    mount_domain(
        &server,
        "a",
        ResponseTemplate::new(200).set_body_json(domain_response("a", "X", &[2], 1000)),
    )
    .await;

    Mock::given(method("POST"))
        .and(path("/api"))
        .and(body_string_contains("getEvents"))
        .and(body_string_contains("type: AVERAGE"))
        .and(body_partial_json(json!({"variables": {"range": "LAST_30_DAYS"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"events": [
                {
                    "id": "e1",
                    "title": "Rating",
                    "statistics": {"list": [
                        {"id": "5 stars", "count": 4.5},
                        {"id": "4 stars", "count": 3}
                    ]}
                },
                {
                    "id": "e2",
                    "title": "Download",
                    "statistics": {"list": []}
                }
            ]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let options = QueryOptions::new(RangeSpec::new(30, "LAST_30_DAYS"), 3)
        .kind(ReportKind::with_events("AVERAGE"));
    let client = token_client(&server, options);

    let report = client.get_summary(&["a"]).await.expect("get_summary failed");
    let events = report.events.expect("events missing");

    assert_eq!(events.len(), 2);
    assert_eq!(events[0].title, "Rating");
    assert_eq!(events[0].data[0].count.as_f64(), Some(4.5));
    assert!(events[1].data.is_empty());

    // Event lists come back exactly as the API sent them.
    let json = serde_json::to_value(&events[0]).unwrap();
    assert_eq!(
        json["data"],
        json!([{"id": "5 stars", "count": 4.5}, {"id": "4 stars", "count": 3}])
    );
}

#[tokio::test]
async fn test_invalid_event_type_sends_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let options = QueryOptions::default().kind(ReportKind::with_events("TOTAL) {"));
    let client = token_client(&server, options);

    let err = client.get_summary(&["a"]).await.unwrap_err();
    assert!(matches!(err, Error::Api(ApiError::InvalidOption(_))));
}

#[tokio::test]
async fn test_custom_headers_and_user_agent() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api"))
        .and(header("X-Report-Source", "nightly"))
        .and(header("User-Agent", "report-bot/2.0"))
        .and(header("Authorization", "Bearer t"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"domains": []}})))
        .expect(1)
        .mount(&server)
        .await;

    let client = AnalyticsClient::from_builder(
        ClientConfig::with_token(server.uri(), "t"),
        QueryOptions::default(),
        |builder| {
            builder
                .header("X-Report-Source", "nightly")
                .user_agent("report-bot/2.0")
        },
    )
    .unwrap();

    client.authenticate().await.unwrap();
    assert!(client.list_domains().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_default_user_agent() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api"))
        .and(header(
            "User-Agent",
            format!("ackee-report/{} (Rust)", env!("CARGO_PKG_VERSION")).as_str(),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"domains": []}})))
        .expect(1)
        .mount(&server)
        .await;

    let client = token_client(&server, QueryOptions::default());
    client.list_domains().await.unwrap();
}

#[tokio::test]
async fn test_request_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": {"domains": []}}))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let client = AnalyticsClient::from_builder(
        ClientConfig::with_token(server.uri(), "t"),
        QueryOptions::default(),
        |builder| builder.request_timeout(Duration::from_millis(100)),
    )
    .unwrap();

    let err = client.list_domains().await.unwrap_err();
    assert!(matches!(err, Error::Api(ApiError::Transport(_))));
}
