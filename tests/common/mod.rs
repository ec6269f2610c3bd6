//! In-memory collaborators and an engine harness shared by the integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use mcp_servers::clients::{FieldUpdate, IssueFilter, IssuePatch, IssueTracker, NewIssue, SocialClient};
use mcp_servers::config::{BoardConfig, ServerConfig};
use mcp_servers::error::{DispatchError, ToolError};
use mcp_servers::server::McpServer;
use mcp_servers::tools::{SocialTools, ToolDescriptor, ToolSet};

// ---------------------------------------------------------------------------
// Social
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum SocialCall {
    Me,
    Post { text: String, reply_to: Option<String> },
    HomeTimeline { user_id: String, max_results: u32 },
    UserPosts { user_id: String, max_results: u32 },
}

pub struct FakeSocial {
    pub me: Value,
    pub calls: Mutex<Vec<SocialCall>>,
}

impl FakeSocial {
    pub fn new() -> Self {
        Self::with_me(json!({ "data": { "id": "2244994945", "username": "dev" } }))
    }

    pub fn with_me(me: Value) -> Self {
        Self {
            me,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<SocialCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: SocialCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl SocialClient for FakeSocial {
    async fn me(&self) -> Result<Value, ToolError> {
        self.record(SocialCall::Me);
        Ok(self.me.clone())
    }

    async fn post(&self, text: &str, reply_to: Option<&str>) -> Result<Value, ToolError> {
        self.record(SocialCall::Post {
            text: text.to_string(),
            reply_to: reply_to.map(str::to_string),
        });
        Ok(json!({ "data": { "id": "1445880548472328192", "text": text } }))
    }

    async fn home_timeline(&self, user_id: &str, max_results: u32) -> Result<Value, ToolError> {
        self.record(SocialCall::HomeTimeline {
            user_id: user_id.to_string(),
            max_results,
        });
        Ok(json!({ "data": [{ "id": "1", "text": "hello" }], "meta": { "result_count": 1 } }))
    }

    async fn user_posts(&self, user_id: &str, max_results: u32) -> Result<Value, ToolError> {
        self.record(SocialCall::UserPosts {
            user_id: user_id.to_string(),
            max_results,
        });
        Ok(json!({ "data": [], "meta": { "result_count": 0 } }))
    }
}

// ---------------------------------------------------------------------------
// Issue tracker
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum TrackerCall {
    CreateIssue(NewIssue),
    ListIssues(IssueFilter),
    GetIssue(u64),
    UpdateIssue(u64, IssuePatch),
    AddComment(u64, String),
    AddProjectItem { project_id: String, content_id: String },
    SetField(FieldUpdate),
    ProjectItems(String),
}

pub struct FakeTracker {
    pub created: Value,
    pub issues: HashMap<u64, Value>,
    pub project_items: Value,
    pub set_field_result: Value,
    pub calls: Mutex<Vec<TrackerCall>>,
}

impl FakeTracker {
    pub fn new() -> Self {
        Self {
            created: json!({ "number": 42, "node_id": "I_kwDOnew42", "title": "created" }),
            issues: HashMap::new(),
            project_items: json!({ "data": { "node": { "projectItems": { "nodes": [] } } } }),
            set_field_result: json!({
                "data": { "updateProjectV2ItemFieldValue": { "projectV2Item": { "id": "PVTI_1" } } }
            }),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_issue(mut self, number: u64, issue: Value) -> Self {
        self.issues.insert(number, issue);
        self
    }

    pub fn calls(&self) -> Vec<TrackerCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: TrackerCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl IssueTracker for FakeTracker {
    async fn create_issue(&self, issue: &NewIssue) -> Result<Value, ToolError> {
        self.record(TrackerCall::CreateIssue(issue.clone()));
        Ok(self.created.clone())
    }

    async fn list_issues(&self, filter: &IssueFilter) -> Result<Value, ToolError> {
        self.record(TrackerCall::ListIssues(filter.clone()));
        Ok(json!([]))
    }

    async fn get_issue(&self, number: u64) -> Result<Value, ToolError> {
        self.record(TrackerCall::GetIssue(number));
        Ok(self
            .issues
            .get(&number)
            .cloned()
            .unwrap_or_else(|| json!({ "message": "Not Found", "status": "404" })))
    }

    async fn update_issue(&self, number: u64, patch: &IssuePatch) -> Result<Value, ToolError> {
        self.record(TrackerCall::UpdateIssue(number, patch.clone()));
        Ok(json!({ "number": number, "state": patch.state.clone().unwrap_or_else(|| "open".into()) }))
    }

    async fn add_comment(&self, number: u64, body: &str) -> Result<Value, ToolError> {
        self.record(TrackerCall::AddComment(number, body.to_string()));
        Ok(json!({ "id": 1, "body": body }))
    }

    async fn add_project_item(&self, project_id: &str, content_id: &str) -> Result<Value, ToolError> {
        self.record(TrackerCall::AddProjectItem {
            project_id: project_id.to_string(),
            content_id: content_id.to_string(),
        });
        Ok(json!({ "data": { "addProjectV2ItemById": { "item": { "id": "PVTI_new" } } } }))
    }

    async fn set_single_select_field(&self, update: &FieldUpdate) -> Result<Value, ToolError> {
        self.record(TrackerCall::SetField(update.clone()));
        Ok(self.set_field_result.clone())
    }

    async fn project_items(&self, node_id: &str) -> Result<Value, ToolError> {
        self.record(TrackerCall::ProjectItems(node_id.to_string()));
        Ok(self.project_items.clone())
    }
}

pub fn test_board() -> BoardConfig {
    BoardConfig {
        steps_project_id: "PVT_steps".into(),
        tasks_project_id: "PVT_tasks".into(),
        tasks_status_field_id: "PVTSSF_status".into(),
        tasks_status_options: vec![
            ("todo".into(), "opt-todo".into()),
            ("doing".into(), "opt-doing".into()),
            ("review".into(), "opt-review".into()),
            ("done".into(), "opt-done".into()),
        ],
    }
}

// ---------------------------------------------------------------------------
// Misbehaving tool sets
// ---------------------------------------------------------------------------

/// A registry whose only tool panics or hangs, for exercising the engine's guards.
pub struct BrokenTools {
    descriptors: Vec<ToolDescriptor>,
}

impl BrokenTools {
    pub fn new() -> Self {
        Self {
            descriptors: vec![
                ToolDescriptor {
                    name: "explode",
                    description: "Panics",
                    input_schema: json!({ "type": "object", "properties": {} }),
                },
                ToolDescriptor {
                    name: "hang",
                    description: "Never returns in time",
                    input_schema: json!({ "type": "object", "properties": {} }),
                },
            ],
        }
    }
}

#[async_trait]
impl ToolSet for BrokenTools {
    fn descriptors(&self) -> &[ToolDescriptor] {
        &self.descriptors
    }

    async fn call(&self, name: &str, _arguments: Value) -> Result<Value, DispatchError> {
        match name {
            "explode" => panic!("handler blew up"),
            "hang" => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(json!({}))
            }
            other => Err(DispatchError::UnknownTool(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Engine harness
// ---------------------------------------------------------------------------

pub fn social_server() -> McpServer {
    McpServer::new(Arc::new(SocialTools::new(FakeSocial::new())), ServerConfig::default())
}

/// Feed `input` through the read loop and return each output line parsed.
pub async fn run_lines(server: &McpServer, input: &str) -> Vec<Value> {
    let raw = run_raw(server, input).await;
    raw.lines()
        .map(|line| serde_json::from_str(line).expect("every output line must be JSON"))
        .collect()
}

/// Feed `input` through the read loop and return the raw output text.
pub async fn run_raw(server: &McpServer, input: &str) -> String {
    let mut output = Vec::new();
    server
        .serve(input.as_bytes(), &mut output)
        .await
        .expect("serve should only stop at end of input");
    String::from_utf8(output).expect("output must be UTF-8")
}
