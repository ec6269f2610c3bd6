use serde::Deserialize;
use serde_json::{json, Value};

use crate::clients::SocialClient;
use crate::error::ToolError;
use crate::tools::parse_args;

const DEFAULT_MAX_RESULTS: u32 = 10;

#[derive(Debug, Deserialize)]
struct TweetArgs {
    text: String,
    #[serde(default)]
    reply_to: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PageArgs {
    #[serde(default = "default_max_results")]
    max_results: u32,
}

fn default_max_results() -> u32 {
    DEFAULT_MAX_RESULTS
}

/// Handle a `tweet` tool call.
pub async fn tweet<C: SocialClient + ?Sized>(client: &C, arguments: Value) -> Result<Value, ToolError> {
    let args: TweetArgs = parse_args("tweet", arguments)?;
    let reply_to = args.reply_to.as_deref().filter(|id| !id.is_empty());
    client.post(&args.text, reply_to).await
}

/// Handle a `get_timeline` tool call.
pub async fn get_timeline<C: SocialClient + ?Sized>(
    client: &C,
    arguments: Value,
) -> Result<Value, ToolError> {
    let args: PageArgs = parse_args("get_timeline", arguments)?;
    match current_user_id(client).await? {
        Ok(user_id) => client.home_timeline(&user_id, args.max_results).await,
        Err(unresolved) => Ok(unresolved),
    }
}

/// Handle a `get_my_tweets` tool call.
pub async fn get_my_tweets<C: SocialClient + ?Sized>(
    client: &C,
    arguments: Value,
) -> Result<Value, ToolError> {
    let args: PageArgs = parse_args("get_my_tweets", arguments)?;
    match current_user_id(client).await? {
        Ok(user_id) => client.user_posts(&user_id, args.max_results).await,
        Err(unresolved) => Ok(unresolved),
    }
}

/// Look up `data.id` from `users/me`.
///
/// The inner `Err` is not a failure of the call: it is the tool output to
/// return when the API did not yield an id.
async fn current_user_id<C: SocialClient + ?Sized>(
    client: &C,
) -> Result<Result<String, Value>, ToolError> {
    let me = client.me().await?;
    match me.pointer("/data/id").and_then(Value::as_str) {
        Some(id) if !id.is_empty() => Ok(Ok(id.to_string())),
        _ => {
            tracing::warn!("users/me did not return a user id");
            Ok(Err(json!({ "error": "Could not get user ID", "details": me })))
        }
    }
}
