use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::Method;
use serde_json::{json, Value};

use super::{parse_body, user_agent, FieldUpdate, IssueFilter, IssuePatch, IssueTracker, NewIssue};
use crate::config::GitHubConfig;
use crate::error::ToolError;

const API_VERSION: &str = "2022-11-28";

const ADD_PROJECT_ITEM: &str = "mutation($projectId: ID!, $contentId: ID!) {
  addProjectV2ItemById(input: { projectId: $projectId, contentId: $contentId }) {
    item { id }
  }
}";

const SET_SINGLE_SELECT: &str = "mutation($projectId: ID!, $itemId: ID!, $fieldId: ID!, $optionId: String!) {
  updateProjectV2ItemFieldValue(input: {
    projectId: $projectId
    itemId: $itemId
    fieldId: $fieldId
    value: { singleSelectOptionId: $optionId }
  }) {
    projectV2Item { id }
  }
}";

const PROJECT_ITEMS: &str = "query($nodeId: ID!) {
  node(id: $nodeId) {
    ... on Issue {
      projectItems(first: 10) {
        nodes {
          id
          project { id }
        }
      }
    }
  }
}";

/// GitHub REST + GraphQL client scoped to one repository.
pub struct GitHubClient {
    http: reqwest::Client,
    api_base: String,
    owner: String,
    repo: String,
}

impl GitHubClient {
    pub fn new(config: &GitHubConfig, timeout: Duration) -> Result<Self, ToolError> {
        let mut headers = HeaderMap::new();
        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", config.token))?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert("X-GitHub-Api-Version", HeaderValue::from_static(API_VERSION));

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent())
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            api_base: config.api_base.clone(),
            owner: config.owner.clone(),
            repo: config.repo.clone(),
        })
    }

    fn issues_url(&self) -> String {
        format!("{}/repos/{}/{}/issues", self.api_base, self.owner, self.repo)
    }

    async fn send(
        &self,
        method: Method,
        url: String,
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<Value, ToolError> {
        tracing::debug!(%method, url = %url, "GitHub request");

        let mut request = self.http.request(method, &url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        if !status.is_success() {
            tracing::warn!(url = %url, status = status.as_u16(), "GitHub returned an error status");
        }
        Ok(parse_body(&bytes))
    }

    async fn graphql(&self, query: &str, variables: Value) -> Result<Value, ToolError> {
        let url = format!("{}/graphql", self.api_base);
        let body = json!({ "query": query, "variables": variables });
        self.send(Method::POST, url, &[], Some(&body)).await
    }
}

#[async_trait]
impl IssueTracker for GitHubClient {
    async fn create_issue(&self, issue: &NewIssue) -> Result<Value, ToolError> {
        let body = serde_json::to_value(issue)?;
        self.send(Method::POST, self.issues_url(), &[], Some(&body)).await
    }

    async fn list_issues(&self, filter: &IssueFilter) -> Result<Value, ToolError> {
        self.send(Method::GET, self.issues_url(), &filter.query(), None).await
    }

    async fn get_issue(&self, number: u64) -> Result<Value, ToolError> {
        let url = format!("{}/{number}", self.issues_url());
        self.send(Method::GET, url, &[], None).await
    }

    async fn update_issue(&self, number: u64, patch: &IssuePatch) -> Result<Value, ToolError> {
        let url = format!("{}/{number}", self.issues_url());
        let body = serde_json::to_value(patch)?;
        self.send(Method::PATCH, url, &[], Some(&body)).await
    }

    async fn add_comment(&self, number: u64, body: &str) -> Result<Value, ToolError> {
        let url = format!("{}/{number}/comments", self.issues_url());
        self.send(Method::POST, url, &[], Some(&json!({ "body": body }))).await
    }

    async fn add_project_item(&self, project_id: &str, content_id: &str) -> Result<Value, ToolError> {
        self.graphql(
            ADD_PROJECT_ITEM,
            json!({ "projectId": project_id, "contentId": content_id }),
        )
        .await
    }

    async fn set_single_select_field(&self, update: &FieldUpdate) -> Result<Value, ToolError> {
        self.graphql(
            SET_SINGLE_SELECT,
            json!({
                "projectId": update.project_id,
                "itemId": update.item_id,
                "fieldId": update.field_id,
                "optionId": update.option_id,
            }),
        )
        .await
    }

    async fn project_items(&self, node_id: &str) -> Result<Value, ToolError> {
        self.graphql(PROJECT_ITEMS, json!({ "nodeId": node_id })).await
    }
}
