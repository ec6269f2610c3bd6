use async_trait::async_trait;
use serde_json::{json, Value};

use super::{object_schema, ToolDescriptor, ToolKind, ToolSet};
use crate::clients::IssueTracker;
use crate::config::BoardConfig;
use crate::error::DispatchError;
use crate::handlers::issues;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueTool {
    CreateIssue,
    ListIssues,
    GetIssue,
    UpdateIssue,
    CloseIssue,
    AddComment,
    CreateStep,
    CreateTask,
    MoveTaskStatus,
}

impl ToolKind for IssueTool {
    const ALL: &'static [Self] = &[
        Self::CreateIssue,
        Self::ListIssues,
        Self::GetIssue,
        Self::UpdateIssue,
        Self::CloseIssue,
        Self::AddComment,
        Self::CreateStep,
        Self::CreateTask,
        Self::MoveTaskStatus,
    ];

    fn name(self) -> &'static str {
        match self {
            Self::CreateIssue => "create_issue",
            Self::ListIssues => "list_issues",
            Self::GetIssue => "get_issue",
            Self::UpdateIssue => "update_issue",
            Self::CloseIssue => "close_issue",
            Self::AddComment => "add_comment",
            Self::CreateStep => "create_step",
            Self::CreateTask => "create_task",
            Self::MoveTaskStatus => "move_task_status",
        }
    }

    fn description(self) -> &'static str {
        match self {
            Self::CreateIssue => "Create a new GitHub issue (task/story)",
            Self::ListIssues => "List GitHub issues",
            Self::GetIssue => "Get a specific GitHub issue by number",
            Self::UpdateIssue => "Update a GitHub issue",
            Self::CloseIssue => "Close a GitHub issue",
            Self::AddComment => "Add a comment to a GitHub issue",
            Self::CreateStep => "Create a Step (user story) and add it to the Steps board",
            Self::CreateTask => "Create a Task linked to a parent Step and add it to the Tareas board",
            Self::MoveTaskStatus => "Move a task to a different status column in the Tareas board",
        }
    }

    fn input_schema(self) -> Value {
        match self {
            Self::CreateIssue => object_schema(
                json!({
                    "title": { "type": "string", "description": "Issue title" },
                    "body": {
                        "type": "string",
                        "description": "Issue body/description (markdown supported)"
                    },
                    "labels": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Labels to add (e.g., [\"bug\", \"enhancement\"])"
                    }
                }),
                &["title"],
            ),
            Self::ListIssues => object_schema(
                json!({
                    "state": {
                        "type": "string",
                        "enum": ["open", "closed", "all"],
                        "description": "Filter by state: open, closed, all (default: open)"
                    },
                    "labels": {
                        "type": "string",
                        "description": "Filter by labels (comma-separated)"
                    },
                    "per_page": {
                        "type": "integer",
                        "minimum": 1,
                        "maximum": 100,
                        "description": "Results per page (default: 10)"
                    }
                }),
                &[],
            ),
            Self::GetIssue => object_schema(
                json!({
                    "issue_number": { "type": "integer", "description": "Issue number" }
                }),
                &["issue_number"],
            ),
            Self::UpdateIssue => object_schema(
                json!({
                    "issue_number": { "type": "integer", "description": "Issue number" },
                    "title": { "type": "string", "description": "New title" },
                    "body": { "type": "string", "description": "New body" },
                    "state": {
                        "type": "string",
                        "enum": ["open", "closed"],
                        "description": "State: open or closed"
                    },
                    "labels": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Labels to set"
                    }
                }),
                &["issue_number"],
            ),
            Self::CloseIssue => object_schema(
                json!({
                    "issue_number": { "type": "integer", "description": "Issue number to close" }
                }),
                &["issue_number"],
            ),
            Self::AddComment => object_schema(
                json!({
                    "issue_number": { "type": "integer", "description": "Issue number" },
                    "body": {
                        "type": "string",
                        "description": "Comment body (markdown supported)"
                    }
                }),
                &["issue_number", "body"],
            ),
            Self::CreateStep => object_schema(
                json!({
                    "title": { "type": "string", "description": "Step title" },
                    "user_story": {
                        "type": "string",
                        "description": "User story: Como X, quiero Y, para Z"
                    },
                    "context": {
                        "type": "string",
                        "description": "Context explaining why this is needed"
                    },
                    "criteria": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Acceptance criteria (Dado/Cuando/Entonces)"
                    },
                    "priority": {
                        "type": "string",
                        "enum": ["high", "medium", "low"],
                        "description": "Priority: high, medium, low (default: medium)"
                    }
                }),
                &["title", "user_story", "context", "criteria"],
            ),
            Self::CreateTask => object_schema(
                json!({
                    "title": { "type": "string", "description": "Task title" },
                    "description": {
                        "type": "string",
                        "description": "Technical description of the task"
                    },
                    "parent_step": {
                        "type": "integer",
                        "description": "Parent Step issue number"
                    },
                    "priority": {
                        "type": "string",
                        "enum": ["high", "medium", "low"],
                        "description": "Priority: high, medium, low (default: medium)"
                    }
                }),
                &["title", "description", "parent_step"],
            ),
            Self::MoveTaskStatus => object_schema(
                json!({
                    "issue_number": { "type": "integer", "description": "Task issue number" },
                    "status": {
                        "type": "string",
                        "enum": ["todo", "doing", "review", "done"],
                        "description": "New status: todo, doing, review, done"
                    }
                }),
                &["issue_number", "status"],
            ),
        }
    }
}

/// The GitHub registry: issue CRUD plus the step/task board workflow.
pub struct IssueTools<T> {
    tracker: T,
    board: BoardConfig,
    descriptors: Vec<ToolDescriptor>,
}

impl<T: IssueTracker> IssueTools<T> {
    pub fn new(tracker: T, board: BoardConfig) -> Self {
        Self {
            tracker,
            board,
            descriptors: IssueTool::descriptors(),
        }
    }
}

#[async_trait]
impl<T: IssueTracker> ToolSet for IssueTools<T> {
    fn descriptors(&self) -> &[ToolDescriptor] {
        &self.descriptors
    }

    async fn call(&self, name: &str, arguments: Value) -> Result<Value, DispatchError> {
        let tool = IssueTool::from_name(name)
            .ok_or_else(|| DispatchError::UnknownTool(name.to_string()))?;

        let tracker = &self.tracker;
        let result = match tool {
            IssueTool::CreateIssue => issues::create_issue(tracker, arguments).await,
            IssueTool::ListIssues => issues::list_issues(tracker, arguments).await,
            IssueTool::GetIssue => issues::get_issue(tracker, arguments).await,
            IssueTool::UpdateIssue => issues::update_issue(tracker, arguments).await,
            IssueTool::CloseIssue => issues::close_issue(tracker, arguments).await,
            IssueTool::AddComment => issues::add_comment(tracker, arguments).await,
            IssueTool::CreateStep => issues::create_step(tracker, &self.board, arguments).await,
            IssueTool::CreateTask => issues::create_task(tracker, &self.board, arguments).await,
            IssueTool::MoveTaskStatus => {
                issues::move_task_status(tracker, &self.board, arguments).await
            }
        };
        Ok(result?)
    }
}
