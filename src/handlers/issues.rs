use serde::Deserialize;
use serde_json::{json, Value};

use crate::clients::{FieldUpdate, IssueFilter, IssuePatch, IssueTracker, NewIssue};
use crate::config::BoardConfig;
use crate::error::ToolError;
use crate::tools::parse_args;

const TASKS_HEADING: &str = "## Tareas";

#[derive(Debug, Deserialize)]
struct CreateIssueArgs {
    title: String,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    labels: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ListIssuesArgs {
    #[serde(default = "default_state")]
    state: String,
    #[serde(default)]
    labels: Option<String>,
    #[serde(default = "default_per_page")]
    per_page: u32,
}

#[derive(Debug, Deserialize)]
struct IssueNumberArgs {
    issue_number: u64,
}

#[derive(Debug, Deserialize)]
struct UpdateIssueArgs {
    issue_number: u64,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    labels: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct AddCommentArgs {
    issue_number: u64,
    body: String,
}

#[derive(Debug, Deserialize)]
struct CreateStepArgs {
    title: String,
    user_story: String,
    context: String,
    criteria: Vec<String>,
    #[serde(default = "default_priority")]
    priority: String,
}

#[derive(Debug, Deserialize)]
struct CreateTaskArgs {
    title: String,
    description: String,
    parent_step: u64,
    #[serde(default = "default_priority")]
    priority: String,
}

#[derive(Debug, Deserialize)]
struct MoveTaskStatusArgs {
    issue_number: u64,
    status: String,
}

fn default_state() -> String {
    "open".into()
}

fn default_per_page() -> u32 {
    10
}

fn default_priority() -> String {
    "medium".into()
}

pub async fn create_issue<T: IssueTracker + ?Sized>(tracker: &T, arguments: Value) -> Result<Value, ToolError> {
    let args: CreateIssueArgs = parse_args("create_issue", arguments)?;
    let issue = NewIssue {
        title: args.title,
        body: args.body.filter(|b| !b.is_empty()),
        labels: args.labels,
    };
    tracker.create_issue(&issue).await
}

pub async fn list_issues<T: IssueTracker + ?Sized>(tracker: &T, arguments: Value) -> Result<Value, ToolError> {
    let args: ListIssuesArgs = parse_args("list_issues", arguments)?;
    let filter = IssueFilter {
        state: args.state,
        labels: args.labels.filter(|l| !l.is_empty()),
        per_page: args.per_page,
    };
    tracker.list_issues(&filter).await
}

pub async fn get_issue<T: IssueTracker + ?Sized>(tracker: &T, arguments: Value) -> Result<Value, ToolError> {
    let args: IssueNumberArgs = parse_args("get_issue", arguments)?;
    tracker.get_issue(args.issue_number).await
}

pub async fn update_issue<T: IssueTracker + ?Sized>(tracker: &T, arguments: Value) -> Result<Value, ToolError> {
    let args: UpdateIssueArgs = parse_args("update_issue", arguments)?;
    let patch = IssuePatch {
        title: args.title,
        body: args.body,
        state: args.state,
        labels: args.labels,
    };
    tracker.update_issue(args.issue_number, &patch).await
}

pub async fn close_issue<T: IssueTracker + ?Sized>(tracker: &T, arguments: Value) -> Result<Value, ToolError> {
    let args: IssueNumberArgs = parse_args("close_issue", arguments)?;
    let patch = IssuePatch {
        state: Some("closed".into()),
        ..IssuePatch::default()
    };
    tracker.update_issue(args.issue_number, &patch).await
}

pub async fn add_comment<T: IssueTracker + ?Sized>(tracker: &T, arguments: Value) -> Result<Value, ToolError> {
    let args: AddCommentArgs = parse_args("add_comment", arguments)?;
    tracker.add_comment(args.issue_number, &args.body).await
}

/// Handle a `create_step` tool call.
///
/// Files a user story with acceptance criteria as a checklist, labels it
/// `step`/`backlog`/`priority:*`, and puts it on the Steps board.
pub async fn create_step<T: IssueTracker + ?Sized>(
    tracker: &T,
    board: &BoardConfig,
    arguments: Value,
) -> Result<Value, ToolError> {
    let args: CreateStepArgs = parse_args("create_step", arguments)?;

    let issue = NewIssue {
        body: Some(step_body(&args.user_story, &args.context, &args.criteria)),
        labels: vec!["step".into(), "backlog".into(), format!("priority:{}", args.priority)],
        title: args.title,
    };
    let created = tracker.create_issue(&issue).await?;

    if let Some(node_id) = created.get("node_id").and_then(Value::as_str) {
        tracker.add_project_item(&board.steps_project_id, node_id).await?;
    }

    Ok(created)
}

/// Handle a `create_task` tool call.
///
/// Files the task on the Tasks board and appends a checklist line for it to
/// the parent step's body.
pub async fn create_task<T: IssueTracker + ?Sized>(
    tracker: &T,
    board: &BoardConfig,
    arguments: Value,
) -> Result<Value, ToolError> {
    let args: CreateTaskArgs = parse_args("create_task", arguments)?;

    let issue = NewIssue {
        title: args.title.clone(),
        body: Some(task_body(&args.description, args.parent_step)),
        labels: vec!["task".into(), "todo".into(), format!("priority:{}", args.priority)],
    };
    let created = tracker.create_issue(&issue).await?;

    if let Some(node_id) = created.get("node_id").and_then(Value::as_str) {
        tracker.add_project_item(&board.tasks_project_id, node_id).await?;
    }

    if let Some(number) = created.get("number").and_then(Value::as_u64) {
        link_task_to_step(tracker, args.parent_step, number, &args.title).await?;
    }

    Ok(created)
}

/// Handle a `move_task_status` tool call.
pub async fn move_task_status<T: IssueTracker + ?Sized>(
    tracker: &T,
    board: &BoardConfig,
    arguments: Value,
) -> Result<Value, ToolError> {
    let args: MoveTaskStatusArgs = parse_args("move_task_status", arguments)?;
    let status = args.status.to_lowercase();

    let Some(option_id) = board.status_option(&status) else {
        return Ok(json!({
            "error": format!(
                "Invalid status: {status}. Valid: {}",
                board.status_names().join(", ")
            )
        }));
    };

    let Some(item_id) = tasks_board_item(tracker, board, args.issue_number).await? else {
        return Ok(json!({
            "error": format!("Task #{} not found in Tareas board", args.issue_number)
        }));
    };

    let update = FieldUpdate {
        project_id: board.tasks_project_id.clone(),
        item_id,
        field_id: board.tasks_status_field_id.clone(),
        option_id: option_id.to_string(),
    };
    let result = tracker.set_single_select_field(&update).await?;

    if result.pointer("/data/updateProjectV2ItemFieldValue").is_some_and(|v| !v.is_null()) {
        tracing::info!(issue = args.issue_number, status = %status, "task moved");
        return Ok(json!({ "success": true, "status": status, "issue": args.issue_number }));
    }

    Ok(result)
}

fn step_body(user_story: &str, context: &str, criteria: &[String]) -> String {
    let mut body = format!(
        "## User Story\n\n{user_story}\n\n## Contexto\n\n{context}\n\n## Criterios de aceptación\n\n"
    );
    for criterion in criteria {
        body.push_str(&format!("- [ ] {criterion}\n"));
    }
    body
}

fn task_body(description: &str, parent_step: u64) -> String {
    format!("## Descripción\n\n{description}\n\n## Parent Step\n\nResolves #{parent_step}")
}

/// Append `- [ ] #N title` to the step's task list, creating the list if needed.
///
/// A step without a body (or one that does not exist) is left untouched.
async fn link_task_to_step<T: IssueTracker + ?Sized>(
    tracker: &T,
    step_number: u64,
    task_number: u64,
    task_title: &str,
) -> Result<(), ToolError> {
    let step = tracker.get_issue(step_number).await?;
    let Some(body) = step.get("body").and_then(Value::as_str) else {
        tracing::warn!(step = step_number, task = task_number, "parent step not found, task not linked");
        return Ok(());
    };

    let line = format!("- [ ] #{task_number} {task_title}");
    let body = if body.contains(TASKS_HEADING) {
        format!("{body}\n{line}")
    } else {
        format!("{body}\n\n{TASKS_HEADING}\n\n{line}")
    };

    let patch = IssuePatch {
        body: Some(body),
        ..IssuePatch::default()
    };
    tracker.update_issue(step_number, &patch).await?;
    Ok(())
}

/// Find the issue's item id on the Tasks board.
async fn tasks_board_item<T: IssueTracker + ?Sized>(
    tracker: &T,
    board: &BoardConfig,
    issue_number: u64,
) -> Result<Option<String>, ToolError> {
    let issue = tracker.get_issue(issue_number).await?;
    let Some(node_id) = issue.get("node_id").and_then(Value::as_str) else {
        return Ok(None);
    };

    let items = tracker.project_items(node_id).await?;
    let item_id = items
        .pointer("/data/node/projectItems/nodes")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .find(|item| {
            item.pointer("/project/id").and_then(Value::as_str) == Some(board.tasks_project_id.as_str())
        })
        .and_then(|item| item.get("id").and_then(Value::as_str))
        .map(str::to_string);

    Ok(item_id)
}
