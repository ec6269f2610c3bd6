use std::time::Duration;

/// Configuration could not be loaded from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is not set")]
    Missing(&'static str),
    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// OAuth 1.0a signing failure.
#[derive(Debug, thiserror::Error)]
pub enum SigningError {
    #[error("OAuth credential `{0}` is missing or empty")]
    MissingCredential(&'static str),
    #[error("Invalid URL to sign: {0}")]
    InvalidUrl(String),
    #[error("HMAC key rejected: {0}")]
    Key(String),
}

/// Failure raised by a tool handler or the collaborator it calls.
///
/// Upstream API errors (4xx/5xx bodies) are not represented here; those are
/// returned to the caller as ordinary tool output.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Invalid arguments for {tool}: {source}")]
    InvalidArguments {
        tool: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Signing(#[from] SigningError),
    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Tool call timed out after {} seconds", .0.as_secs())]
    Timeout(Duration),
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Outcome of looking up and invoking a tool by name.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
    #[error(transparent)]
    Tool(#[from] ToolError),
}

/// Unrecoverable transport failure on stdin/stdout.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("stdio error: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot encode response: {0}")]
    Encode(#[from] serde_json::Error),
}
