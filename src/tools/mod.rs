//! Tool registries.
//!
//! Each registry is an enum of tool identifiers; the descriptor list and the
//! call-site dispatch are both derived from the same enum, so a tool cannot
//! be advertised without a handler or vice versa.

pub mod issues;
pub mod social;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::error::DispatchError;

pub use issues::{IssueTool, IssueTools};
pub use social::{SocialTool, SocialTools};

/// Advertised shape of a tool in `tools/list`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Compile-time tool set: name lookup, descriptor, registration order.
pub trait ToolKind: Copy + Sized + 'static {
    /// Registration order, as advertised by `tools/list`.
    const ALL: &'static [Self];

    fn name(self) -> &'static str;

    fn description(self) -> &'static str;

    fn input_schema(self) -> Value;

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|tool| tool.name() == name)
    }

    fn descriptor(self) -> ToolDescriptor {
        ToolDescriptor {
            name: self.name(),
            description: self.description(),
            input_schema: self.input_schema(),
        }
    }

    fn descriptors() -> Vec<ToolDescriptor> {
        Self::ALL.iter().map(|tool| tool.descriptor()).collect()
    }
}

/// A registry the protocol engine can list and call into.
#[async_trait]
pub trait ToolSet: Send + Sync {
    fn descriptors(&self) -> &[ToolDescriptor];

    /// Invoke `name` with `arguments`; the returned value is the raw tool output.
    async fn call(&self, name: &str, arguments: Value) -> Result<Value, DispatchError>;
}

/// Deserialize a handler's argument struct, naming the tool on failure.
pub(crate) fn parse_args<T: serde::de::DeserializeOwned>(
    tool: &'static str,
    arguments: Value,
) -> Result<T, crate::error::ToolError> {
    serde_json::from_value(arguments)
        .map_err(|source| crate::error::ToolError::InvalidArguments { tool, source })
}

/// `{"type": "object", "properties": ..., "required": [...]}`.
pub(crate) fn object_schema(properties: Value, required: &[&str]) -> Value {
    let mut schema = serde_json::json!({
        "type": "object",
        "properties": properties,
    });
    if !required.is_empty() {
        schema["required"] = serde_json::json!(required);
    }
    schema
}
