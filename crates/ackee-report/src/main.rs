use std::path::PathBuf;

use ackee_report_client::{AnalyticsClient, RangePreset};
use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;

use config::{AppConfig, CliOverrides, EnvOverrides};

#[derive(Parser)]
#[command(name = "ackee-report")]
#[command(version)]
#[command(about = "Summary reports from an Ackee analytics server")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Ackee server URL
    #[arg(long, global = true)]
    server: Option<String>,

    /// Pre-issued permanent token
    #[arg(long, global = true)]
    token: Option<String>,

    /// Domain id to report on (repeatable)
    #[arg(short = 'd', long = "domain", value_name = "ID", global = true)]
    domains: Vec<String>,

    /// Time range (LAST_24_HOURS, LAST_7_DAYS, LAST_30_DAYS, LAST_6_MONTHS)
    #[arg(short = 'r', long, global = true)]
    range: Option<RangePreset>,

    /// Entries per statistics list
    #[arg(short = 'l', long, global = true)]
    limit: Option<u32>,

    /// Include event statistics
    #[arg(long, global = true, overrides_with = "no_events")]
    events: bool,

    /// Leave out event statistics, even when the config file asks for them
    #[arg(long, global = true, overrides_with = "events")]
    no_events: bool,

    /// Event list type
    #[arg(long, value_name = "TYPE", global = true)]
    event_type: Option<String>,

    /// Log level or filter directive (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Indent the JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Default, PartialEq)]
enum Command {
    /// List every domain
    Domains,
    /// Print the aggregate report (default)
    #[default]
    Summary,
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            server: self.server.clone(),
            token: self.token.clone(),
            domains: self.domains.clone(),
            range: self.range,
            limit: self.limit,
            events: match (self.events, self.no_events) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            },
            event_type: self.event_type.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.log_level.as_deref());

    let config = AppConfig::load(cli.config.as_deref(), EnvOverrides::from_env(), cli.overrides())?;
    let client = AnalyticsClient::with_options(config.client, config.options)?;

    client
        .authenticate()
        .await
        .with_context(|| format!("failed to authenticate against {}", client.endpoint()))?;

    match cli.command.unwrap_or_default() {
        Command::Domains => {
            let domains = client.list_domains().await?;
            print_json(&domains, cli.pretty)?;
        }
        Command::Summary => {
            let ids = if config.domains.is_empty() {
                info!("no domains configured, reporting on every domain");
                client
                    .list_domains()
                    .await?
                    .into_iter()
                    .map(|domain| domain.id)
                    .collect()
            } else {
                config.domains
            };

            let report = client.get_summary(&ids).await?;
            print_json(&report, cli.pretty)?;
        }
    }

    Ok(())
}

/// Log to stderr so stdout carries only JSON.
fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{json}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_command() {
        let cli = Cli::try_parse_from(["ackee-report", "--server", "https://a.example"]).unwrap();
        assert_eq!(cli.command, None);
        assert_eq!(cli.command.unwrap_or_default(), Command::Summary);
    }

    #[test]
    fn test_summary_flags() {
        let cli = Cli::try_parse_from([
            "ackee-report",
            "summary",
            "-d",
            "a",
            "--domain",
            "b",
            "--range",
            "LAST_30_DAYS",
            "--limit",
            "3",
            "--events",
            "--event-type",
            "AVERAGE",
            "--pretty",
        ])
        .unwrap();

        assert_eq!(cli.command, Some(Command::Summary));
        assert!(cli.pretty);

        let overrides = cli.overrides();
        assert_eq!(overrides.domains, vec!["a", "b"]);
        assert_eq!(overrides.range, Some(RangePreset::Last30Days));
        assert_eq!(overrides.limit, Some(3));
        assert_eq!(overrides.events, Some(true));
        assert_eq!(overrides.event_type.as_deref(), Some("AVERAGE"));
    }

    #[test]
    fn test_domains_command() {
        let cli = Cli::try_parse_from(["ackee-report", "domains", "--token", "t"]).unwrap();
        assert_eq!(cli.command, Some(Command::Domains));
        assert_eq!(cli.overrides().token.as_deref(), Some("t"));
    }

    #[test]
    fn test_events_flags() {
        let cli = Cli::try_parse_from(["ackee-report", "--no-events"]).unwrap();
        assert_eq!(cli.overrides().events, Some(false));

        let cli = Cli::try_parse_from(["ackee-report"]).unwrap();
        assert_eq!(cli.overrides().events, None);

        // The last of the two flags wins.
        let cli = Cli::try_parse_from(["ackee-report", "--events", "--no-events"]).unwrap();
        assert_eq!(cli.overrides().events, Some(false));
    }

    #[test]
    fn test_unknown_range_rejected() {
        assert!(Cli::try_parse_from(["ackee-report", "--range", "YESTERDAY"]).is_err());
    }
}
