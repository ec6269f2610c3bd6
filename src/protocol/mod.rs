pub mod request;
pub mod response;

pub use request::{is_notification, ClientInfo, InitializeParams, JsonRpcRequest, RpcId, ToolCallParams};
pub use response::{JsonRpcError, JsonRpcResponse, ToolResult, ToolResultContent};
