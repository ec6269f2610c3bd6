//! External collaborators: the X API and the GitHub issue tracker.
//!
//! Handlers only see the [`SocialClient`] and [`IssueTracker`] traits; the
//! reqwest-backed implementations are constructed once in `main`.

pub mod github;
pub mod x;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::error::ToolError;

pub use github::GitHubClient;
pub use x::XClient;

/// Can post to and read from a social timeline.
#[async_trait]
pub trait SocialClient: Send + Sync {
    /// The authenticated user (`users/me`).
    async fn me(&self) -> Result<Value, ToolError>;

    async fn post(&self, text: &str, reply_to: Option<&str>) -> Result<Value, ToolError>;

    async fn home_timeline(&self, user_id: &str, max_results: u32) -> Result<Value, ToolError>;

    async fn user_posts(&self, user_id: &str, max_results: u32) -> Result<Value, ToolError>;
}

/// Can create, list and update issues and file them onto project boards.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    async fn create_issue(&self, issue: &NewIssue) -> Result<Value, ToolError>;

    async fn list_issues(&self, filter: &IssueFilter) -> Result<Value, ToolError>;

    async fn get_issue(&self, number: u64) -> Result<Value, ToolError>;

    async fn update_issue(&self, number: u64, patch: &IssuePatch) -> Result<Value, ToolError>;

    async fn add_comment(&self, number: u64, body: &str) -> Result<Value, ToolError>;

    /// Add an issue (by node id) to a project board.
    async fn add_project_item(&self, project_id: &str, content_id: &str) -> Result<Value, ToolError>;

    /// Set a single-select field on a project item.
    async fn set_single_select_field(&self, update: &FieldUpdate) -> Result<Value, ToolError>;

    /// Project board memberships of an issue (by node id).
    async fn project_items(&self, node_id: &str) -> Result<Value, ToolError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewIssue {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueFilter {
    pub state: String,
    pub labels: Option<String>,
    pub per_page: u32,
}

impl IssueFilter {
    pub fn query(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("state".to_string(), self.state.clone()),
            ("per_page".to_string(), self.per_page.to_string()),
        ];
        if let Some(labels) = &self.labels {
            params.push(("labels".to_string(), labels.clone()));
        }
        params
    }
}

/// Fields to change on an issue; unset fields are left alone upstream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IssuePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldUpdate {
    pub project_id: String,
    pub item_id: String,
    pub field_id: String,
    pub option_id: String,
}

/// Decode an upstream body regardless of status code.
///
/// API-level errors come back as JSON and are passed through untouched; an
/// empty or non-JSON body is reported as `{"error": "Empty response"}`.
pub(crate) fn parse_body(bytes: &[u8]) -> Value {
    match serde_json::from_slice::<Value>(bytes) {
        Ok(v @ (Value::Object(_) | Value::Array(_))) => v,
        _ => serde_json::json!({ "error": "Empty response" }),
    }
}

pub(crate) fn user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::parse_body;
    use serde_json::json;

    #[test]
    fn json_bodies_pass_through() {
        let body = br#"{"title":"Unauthorized","status":401}"#;
        assert_eq!(parse_body(body), json!({ "title": "Unauthorized", "status": 401 }));
        assert_eq!(parse_body(b"[]"), json!([]));
    }

    #[test]
    fn empty_or_non_json_bodies_are_reported() {
        let empty = json!({ "error": "Empty response" });
        assert_eq!(parse_body(b""), empty);
        assert_eq!(parse_body(b"<html>Bad Gateway</html>"), empty);
        assert_eq!(parse_body(b"null"), empty);
        assert_eq!(parse_body(b"\"text\""), empty);
    }
}
