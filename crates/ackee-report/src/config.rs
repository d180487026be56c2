//! Layered configuration: TOML file, then environment, then flags.

use std::path::{Path, PathBuf};

use ackee_report_client::{ClientConfig, QueryOptions, RangePreset, ReportKind};
use directories::ProjectDirs;
use serde::Deserialize;
use thiserror::Error;

/// Errors while assembling the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("no server URL configured (set `server` in [ackee], ACKEE_SERVER or --server)")]
    MissingServer,
}

/// Contents of the config file.
#[derive(Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub ackee: ServerSection,
    pub report: ReportSection,
}

/// The `[ackee]` table.
#[derive(Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerSection {
    pub server: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub token: Option<String>,
}

/// The `[report]` table.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportSection {
    pub domains: Vec<String>,
    pub range: RangePreset,
    pub limit: u32,
    pub events: bool,
    pub event_type: String,
}

impl Default for ReportSection {
    fn default() -> Self {
        Self {
            domains: Vec::new(),
            range: RangePreset::default(),
            limit: QueryOptions::default().limit,
            events: false,
            event_type: "TOTAL".to_string(),
        }
    }
}

impl FileConfig {
    /// Read and parse a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }
}

/// Values taken from `ACKEE_*` environment variables.
#[derive(Default)]
pub struct EnvOverrides {
    pub server: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub token: Option<String>,
}

impl EnvOverrides {
    /// Read the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read variables through `lookup`. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());
        Self {
            server: get("ACKEE_SERVER"),
            username: get("ACKEE_USERNAME"),
            password: get("ACKEE_PASSWORD"),
            token: get("ACKEE_TOKEN"),
        }
    }
}

/// Values given on the command line.
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub server: Option<String>,
    pub token: Option<String>,
    pub domains: Vec<String>,
    pub range: Option<RangePreset>,
    pub limit: Option<u32>,
    /// `None` keeps the file's setting.
    pub events: Option<bool>,
    pub event_type: Option<String>,
}

/// The resolved configuration of one run.
#[derive(Debug)]
pub struct AppConfig {
    pub client: ClientConfig,
    /// Domain ids to report on; empty means every domain.
    pub domains: Vec<String>,
    pub options: QueryOptions,
}

impl AppConfig {
    /// Load `path`, or the default config file when it exists, and apply
    /// the overrides on top.
    pub fn load(
        path: Option<&Path>,
        env: EnvOverrides,
        cli: CliOverrides,
    ) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => FileConfig::from_file(path)?,
            None => match default_path() {
                Some(path) if path.exists() => FileConfig::from_file(&path)?,
                _ => FileConfig::default(),
            },
        };

        Self::layer(file, env, cli)
    }

    /// Merge the three sources; later sources win.
    pub fn layer(
        file: FileConfig,
        env: EnvOverrides,
        cli: CliOverrides,
    ) -> Result<Self, ConfigError> {
        let FileConfig { ackee, report } = file;

        let server_url = cli
            .server
            .or(env.server)
            .or(ackee.server)
            .filter(|server| !server.trim().is_empty())
            .ok_or(ConfigError::MissingServer)?;

        let client = ClientConfig {
            server_url,
            username: env.username.or(ackee.username),
            password: env.password.or(ackee.password),
            token: cli.token.or(env.token).or(ackee.token),
        };

        let range = cli.range.unwrap_or(report.range);
        let kind = if cli.events.unwrap_or(report.events) {
            ReportKind::with_events(cli.event_type.unwrap_or(report.event_type))
        } else {
            ReportKind::Summary
        };
        let options = QueryOptions::new(range.spec(), cli.limit.unwrap_or(report.limit)).kind(kind);

        let domains = if cli.domains.is_empty() {
            report.domains
        } else {
            cli.domains
        };

        Ok(Self {
            client,
            domains,
            options,
        })
    }
}

/// `<config dir>/ackee-report/config.toml`, when a home directory is known.
pub fn default_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "ackee-report").map(|dirs| dirs.config_dir().join("config.toml"))
}
