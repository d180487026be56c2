//! Fixed GraphQL documents sent to the Ackee API.
//!
//! Only integer options and validated enum literals are interpolated into
//! the documents; everything else travels as variables.

use crate::config::{ClientConfig, RangeSpec};
use crate::error::ApiError;
use crate::graphql::GraphQLRequest;

const CREATE_TOKEN: &str = r#"
    mutation createToken($input: CreateTokenInput!) {
        createToken(input: $input) {
            payload {
                id
            }
        }
    }
"#;

const GET_DOMAINS: &str = r#"
    query getDomains {
        domains {
            id
            title
        }
    }
"#;

/// Token issuance for the configured credentials.
pub fn create_token(username: &str, password: &str) -> GraphQLRequest {
    GraphQLRequest::mutation(CREATE_TOKEN)
        .named("createToken")
        .variable(
            "input",
            serde_json::json!({
                "username": username,
                "password": password,
            }),
        )
}

/// Token issuance from a config, if it carries both credentials.
pub fn create_token_for(config: &ClientConfig) -> Option<GraphQLRequest> {
    config
        .credentials()
        .map(|(username, password)| create_token(username, password))
}

/// All domains with their ids and titles.
pub fn domains() -> GraphQLRequest {
    GraphQLRequest::query(GET_DOMAINS).named("getDomains")
}

/// Facts and statistics of one domain.
pub fn domain(id: &str, range: &RangeSpec, limit: u32) -> GraphQLRequest {
    let days = range.days;
    let query = format!(
        r#"
    query getDomain($id: ID!, $range: Range!) {{
        domain(id: $id) {{
            id
            title
            facts {{
                averageViews {{
                    count
                }}
                averageDuration {{
                    count
                }}
                viewsMonth
                viewsYear
                viewsToday
            }}
            statistics {{
                views(interval: DAILY, type: UNIQUE, limit: {days}) {{
                    count
                    id: value
                }}
                pages(sorting: TOP, limit: {limit}, range: $range) {{
                    count
                    id: value
                }}
                referrers(sorting: TOP, limit: {limit}, range: $range, type: WITH_SOURCE) {{
                    count
                    id: value
                }}
                languages(sorting: TOP, limit: {limit}, range: $range) {{
                    count
                    id: value
                }}
                browsers(sorting: TOP, type: WITH_VERSION, limit: {limit}, range: $range) {{
                    count
                    id: value
                }}
                devices(sorting: TOP, type: WITH_MODEL, limit: {limit}, range: $range) {{
                    count
                    id: value
                }}
                sizes(sorting: TOP, type: SCREEN_RESOLUTION, limit: {limit}, range: $range) {{
                    count
                    id: value
                }}
                systems(sorting: TOP, type: NO_VERSION, limit: {limit}, range: $range) {{
                    count
                    id: value
                }}
            }}
        }}
    }}
"#
    );

    GraphQLRequest::query(query)
        .named("getDomain")
        .variable("id", id)
        .variable("range", &range.input)
}

/// Top entries of every event.
///
/// Fails when `event_type` is not a GraphQL enum name.
pub fn events(event_type: &str, range: &RangeSpec, limit: u32) -> Result<GraphQLRequest, ApiError> {
    check_event_type(event_type)?;

    let query = format!(
        r#"
    query getEvents($range: Range!) {{
        events {{
            id
            title
            statistics {{
                list(sorting: TOP, type: {event_type}, range: $range, limit: {limit}) {{
                    id: value
                    count
                }}
            }}
        }}
    }}
"#
    );

    Ok(GraphQLRequest::query(query)
        .named("getEvents")
        .variable("range", &range.input))
}

/// Reject event types that cannot be placed into the events query.
pub fn check_event_type(event_type: &str) -> Result<(), ApiError> {
    if is_enum_literal(event_type) {
        Ok(())
    } else {
        Err(ApiError::InvalidOption(format!(
            "event type '{event_type}' is not a GraphQL enum value"
        )))
    }
}

fn is_enum_literal(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
