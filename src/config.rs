use std::time::Duration;

use crate::error::ConfigError;

/// Default timeout for a single outbound HTTP request (15 seconds).
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;

/// Default timeout for one whole `tools/call`, which may chain several requests.
const DEFAULT_TOOL_TIMEOUT_SECS: u64 = 60;

const DEFAULT_X_API_BASE: &str = "https://api.twitter.com/2";
const DEFAULT_GITHUB_API_BASE: &str = "https://api.github.com";

const DEFAULT_STEPS_PROJECT_ID: &str = "PVT_kwHOAV6_6M4BNKam";
const DEFAULT_TASKS_PROJECT_ID: &str = "PVT_kwHOAV6_6M4BNKbM";
const DEFAULT_TASKS_STATUS_FIELD_ID: &str = "PVTSSF_lAHOAV6_6M4BNKbMzg8POxU";
const DEFAULT_TASKS_STATUS_OPTIONS: &[(&str, &str)] = &[
    ("todo", "91c009c4"),
    ("doing", "545952ab"),
    ("review", "4ff2a434"),
    ("done", "fecf69ef"),
];

/// Server-wide settings loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub http_timeout: Duration,
    pub tool_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            tool_timeout: Duration::from_secs(DEFAULT_TOOL_TIMEOUT_SECS),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment.
    ///
    /// - `MCP_HTTP_TIMEOUT_SECS` (optional, default 15): max seconds per upstream request
    /// - `MCP_TOOL_TIMEOUT_SECS` (optional, default 60): max seconds per tool call
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let http_timeout = secs(&lookup, "MCP_HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)?;
        let tool_timeout = secs(&lookup, "MCP_TOOL_TIMEOUT_SECS", DEFAULT_TOOL_TIMEOUT_SECS)?;

        Ok(Self {
            http_timeout,
            tool_timeout,
        })
    }
}

/// Credentials and endpoint for the X API.
#[derive(Clone)]
pub struct XConfig {
    pub api_key: String,
    pub api_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
    pub api_base: String,
}

impl std::fmt::Debug for XConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XConfig")
            .field("api_key", &self.api_key)
            .field("access_token", &self.access_token)
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}

impl XConfig {
    /// - `TWITTER_API_KEY`, `TWITTER_API_SECRET`, `TWITTER_ACCESS_TOKEN`,
    ///   `TWITTER_ACCESS_TOKEN_SECRET` (required)
    /// - `TWITTER_API_BASE` (optional)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            api_key: required(&lookup, "TWITTER_API_KEY")?,
            api_secret: required(&lookup, "TWITTER_API_SECRET")?,
            access_token: required(&lookup, "TWITTER_ACCESS_TOKEN")?,
            access_token_secret: required(&lookup, "TWITTER_ACCESS_TOKEN_SECRET")?,
            api_base: optional(&lookup, "TWITTER_API_BASE", DEFAULT_X_API_BASE),
        })
    }
}

/// Project boards that steps and tasks are filed onto.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    pub steps_project_id: String,
    pub tasks_project_id: String,
    pub tasks_status_field_id: String,
    /// Status name → single-select option id, in display order.
    pub tasks_status_options: Vec<(String, String)>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            steps_project_id: DEFAULT_STEPS_PROJECT_ID.into(),
            tasks_project_id: DEFAULT_TASKS_PROJECT_ID.into(),
            tasks_status_field_id: DEFAULT_TASKS_STATUS_FIELD_ID.into(),
            tasks_status_options: DEFAULT_TASKS_STATUS_OPTIONS
                .iter()
                .map(|(name, id)| (name.to_string(), id.to_string()))
                .collect(),
        }
    }
}

impl BoardConfig {
    pub fn status_option(&self, status: &str) -> Option<&str> {
        self.tasks_status_options
            .iter()
            .find(|(name, _)| name == status)
            .map(|(_, id)| id.as_str())
    }

    pub fn status_names(&self) -> Vec<&str> {
        self.tasks_status_options.iter().map(|(name, _)| name.as_str()).collect()
    }
}

/// Token, repository and boards for the GitHub API.
#[derive(Clone)]
pub struct GitHubConfig {
    pub token: String,
    pub owner: String,
    pub repo: String,
    pub api_base: String,
    pub board: BoardConfig,
}

impl std::fmt::Debug for GitHubConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubConfig")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("api_base", &self.api_base)
            .field("board", &self.board)
            .finish_non_exhaustive()
    }
}

impl GitHubConfig {
    /// - `GITHUB_TOKEN`, `GITHUB_OWNER`, `GITHUB_REPO` (required)
    /// - `GITHUB_API_BASE` (optional)
    /// - `GITHUB_STEPS_PROJECT_ID`, `GITHUB_TASKS_PROJECT_ID`,
    ///   `GITHUB_TASKS_STATUS_FIELD_ID`, `GITHUB_TASKS_STATUS_OPTIONS`
    ///   (optional, `name=optionId,...` for the last one)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = BoardConfig::default();

        let tasks_status_options = match lookup("GITHUB_TASKS_STATUS_OPTIONS") {
            Some(raw) if !raw.trim().is_empty() => parse_status_options(&raw)?,
            _ => defaults.tasks_status_options,
        };

        let board = BoardConfig {
            steps_project_id: optional(&lookup, "GITHUB_STEPS_PROJECT_ID", &defaults.steps_project_id),
            tasks_project_id: optional(&lookup, "GITHUB_TASKS_PROJECT_ID", &defaults.tasks_project_id),
            tasks_status_field_id: optional(
                &lookup,
                "GITHUB_TASKS_STATUS_FIELD_ID",
                &defaults.tasks_status_field_id,
            ),
            tasks_status_options,
        };

        Ok(Self {
            token: required(&lookup, "GITHUB_TOKEN")?,
            owner: required(&lookup, "GITHUB_OWNER")?,
            repo: required(&lookup, "GITHUB_REPO")?,
            api_base: optional(&lookup, "GITHUB_API_BASE", DEFAULT_GITHUB_API_BASE),
            board,
        })
    }
}

fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn required(lookup: &impl Fn(&str) -> Option<String>, name: &'static str) -> Result<String, ConfigError> {
    match lookup(name) {
        Some(val) if !val.trim().is_empty() => Ok(val),
        _ => Err(ConfigError::Missing(name)),
    }
}

fn optional(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: &str) -> String {
    match lookup(name) {
        Some(val) if !val.trim().is_empty() => val.trim_end_matches('/').to_string(),
        _ => default.to_string(),
    }
}

fn secs(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: u64,
) -> Result<Duration, ConfigError> {
    let secs = match lookup(name) {
        Some(val) => val
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|s| *s > 0)
            .ok_or_else(|| ConfigError::Invalid {
                name,
                reason: "must be a positive integer".into(),
            })?,
        None => default,
    };
    Ok(Duration::from_secs(secs))
}

fn parse_status_options(raw: &str) -> Result<Vec<(String, String)>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (name, id) = entry.split_once('=').ok_or_else(|| ConfigError::Invalid {
                name: "GITHUB_TASKS_STATUS_OPTIONS",
                reason: format!("expected name=optionId, got `{entry}`"),
            })?;
            Ok((name.trim().to_lowercase(), id.trim().to_string()))
        })
        .collect()
}
