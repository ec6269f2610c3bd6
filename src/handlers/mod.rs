pub mod issues;
pub mod social;

use serde_json::{json, Value};

use crate::config::ServerConfig;
use crate::error::{DispatchError, ToolError};
use crate::protocol::{
    InitializeParams, JsonRpcError, JsonRpcRequest, JsonRpcResponse, ToolCallParams, ToolResult,
};
use crate::tools::ToolSet;

/// MCP protocol revision reported by `initialize`.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Dispatch a JSON-RPC request to the appropriate handler.
///
/// Notifications are filtered out by the server before they get here.
pub async fn dispatch(req: &JsonRpcRequest, tools: &dyn ToolSet, config: &ServerConfig) -> JsonRpcResponse {
    match req.method.as_str() {
        "initialize" => {
            log_client(req.params.as_ref());
            JsonRpcResponse::success(req.id.clone(), initialize_result())
        }

        "ping" => JsonRpcResponse::success(req.id.clone(), json!({ "pong": true })),

        "tools/list" => {
            let result = json!({ "tools": tools.descriptors() });
            JsonRpcResponse::success(req.id.clone(), result)
        }

        "tools/call" => match call_tool(req.params.as_ref(), tools, config).await {
            Ok(result) => JsonRpcResponse::success(req.id.clone(), result),
            Err(error) => JsonRpcResponse::error(req.id.clone(), error),
        },

        _ => {
            tracing::warn!(method = %req.method, "unknown method");
            JsonRpcResponse::error(req.id.clone(), JsonRpcError::method_not_found(&req.method))
        }
    }
}

fn initialize_result() -> Value {
    json!({
        "protocolVersion": PROTOCOL_VERSION,
        "capabilities": {
            "tools": {}
        },
        "serverInfo": {
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION")
        }
    })
}

fn log_client(params: Option<&Value>) {
    let Some(params) = params.and_then(|p| serde_json::from_value::<InitializeParams>(p.clone()).ok())
    else {
        return;
    };
    let client = params.client_info.as_ref();
    tracing::info!(
        protocol_version = params.protocol_version.as_deref().unwrap_or("-"),
        client = client.and_then(|c| c.name.as_deref()).unwrap_or("-"),
        client_version = client.and_then(|c| c.version.as_deref()).unwrap_or("-"),
        "initialize"
    );
}

/// Look up and run a tool, wrapping its output as MCP text content.
async fn call_tool(
    params: Option<&Value>,
    tools: &dyn ToolSet,
    config: &ServerConfig,
) -> Result<Value, JsonRpcError> {
    let params: ToolCallParams = match params {
        Some(v) => serde_json::from_value(v.clone()).map_err(|e| {
            JsonRpcError::invalid_params(format!("Invalid tools/call params: {e}"))
        })?,
        None => return Err(JsonRpcError::invalid_params("Missing params for tools/call")),
    };

    let name = params.name.unwrap_or_default();
    let arguments = match params.arguments {
        Some(Value::Null) | None => json!({}),
        Some(args) => args,
    };

    let outcome = tokio::time::timeout(config.tool_timeout, tools.call(&name, arguments))
        .await
        .unwrap_or_else(|_| Err(ToolError::Timeout(config.tool_timeout).into()));

    let value = match outcome {
        Ok(value) => value,
        Err(DispatchError::UnknownTool(tool)) => {
            tracing::warn!(tool = %tool, "unknown tool");
            return Err(JsonRpcError::invalid_params(format!("Unknown tool: {tool}")));
        }
        Err(DispatchError::Tool(e)) => {
            tracing::error!(tool = %name, error = %e, "tool call failed");
            return Err(JsonRpcError::internal_error(e.to_string()));
        }
    };

    let wrapped = ToolResult::json(&value)
        .and_then(|result| serde_json::to_value(&result))
        .map_err(|e| JsonRpcError::internal_error(format!("Serialization failed: {e}")))?;

    tracing::debug!(tool = %name, "tool call succeeded");
    Ok(wrapped)
}
