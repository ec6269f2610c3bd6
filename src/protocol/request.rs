use serde::{Deserialize, Serialize};

/// JSON-RPC 2.0 id: a number or a string.
///
/// Numbers are kept as `serde_json::Number` so the id echoes back with the
/// exact representation the client sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RpcId {
    Number(serde_json::Number),
    Str(String),
}

impl From<i64> for RpcId {
    fn from(n: i64) -> Self {
        Self::Number(n.into())
    }
}

impl From<&str> for RpcId {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

/// JSON-RPC 2.0 request envelope.
///
/// `jsonrpc` is accepted but not enforced; a missing `method` becomes the
/// empty string and falls through to "method not found".
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcRequest {
    #[serde(default)]
    pub jsonrpc: Option<String>,
    #[serde(default)]
    pub id: Option<RpcId>,
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub params: Option<serde_json::Value>,
}

impl JsonRpcRequest {
    pub fn new(id: Option<RpcId>, method: impl Into<String>, params: Option<serde_json::Value>) -> Self {
        Self {
            jsonrpc: Some("2.0".into()),
            id,
            method: method.into(),
            params,
        }
    }
}

/// Whether a decoded message is a notification and must not be answered.
///
/// Checked on the raw value, before typed decoding, so a notification with
/// an id or method of an unexpected type is still recognised. A message
/// that is not an object is never a notification.
pub fn is_notification(message: &serde_json::Value) -> bool {
    let Some(obj) = message.as_object() else {
        return false;
    };
    let no_id = obj.get("id").map_or(true, serde_json::Value::is_null);
    let notification_method = obj
        .get("method")
        .and_then(serde_json::Value::as_str)
        .is_some_and(|m| m.starts_with("notifications/"));
    no_id || notification_method
}

/// MCP `initialize` params.
#[derive(Debug, Clone, Deserialize)]
pub struct InitializeParams {
    #[serde(rename = "protocolVersion")]
    pub protocol_version: Option<String>,
    #[serde(rename = "clientInfo")]
    pub client_info: Option<ClientInfo>,
}

/// Client information sent during `initialize`.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientInfo {
    pub name: Option<String>,
    pub version: Option<String>,
}

/// Parameters for `tools/call`.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCallParams {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub arguments: Option<serde_json::Value>,
}
