use std::sync::Arc;

use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::handlers;
use crate::protocol::{is_notification, JsonRpcError, JsonRpcRequest, JsonRpcResponse};
use crate::tools::ToolSet;

/// Maximum bytes per JSON-RPC message (1 MiB).
const MAX_MESSAGE_BYTES: usize = 1024 * 1024;

/// MCP server that communicates over stdio using newline-delimited JSON-RPC 2.0.
///
/// Requests are handled strictly one at a time: a line is fully answered
/// before the next one is read.
pub struct McpServer {
    tools: Arc<dyn ToolSet>,
    config: ServerConfig,
}

impl McpServer {
    pub fn new(tools: Arc<dyn ToolSet>, config: ServerConfig) -> Self {
        Self { tools, config }
    }

    pub async fn run(&self) -> Result<(), ServerError> {
        let reader = BufReader::new(tokio::io::stdin());
        let writer = tokio::io::stdout();
        self.serve(reader, writer).await
    }

    /// Read requests from `reader` until end of input, answering on `writer`.
    ///
    /// Only an I/O failure on either stream ends the loop early; every
    /// per-request failure becomes an error response.
    pub async fn serve<R, W>(&self, mut reader: R, mut writer: W) -> Result<(), ServerError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut raw = Vec::new();
        tracing::info!(tools = self.tools.descriptors().len(), "MCP server listening on stdio");

        loop {
            raw.clear();
            // At most one byte past the limit is buffered per line.
            let n = (&mut reader)
                .take(MAX_MESSAGE_BYTES as u64 + 1)
                .read_until(b'\n', &mut raw)
                .await?;
            if n == 0 {
                break;
            }

            if n > MAX_MESSAGE_BYTES {
                if raw.last() != Some(&b'\n') {
                    skip_line(&mut reader).await?;
                }
                tracing::warn!(limit = MAX_MESSAGE_BYTES, "message too large");
                write_response(
                    &mut writer,
                    &JsonRpcResponse::error(None, JsonRpcError::internal_error("Message too large")),
                )
                .await?;
                continue;
            }

            let trimmed = match std::str::from_utf8(&raw) {
                Ok(s) => s.trim(),
                Err(_) => {
                    tracing::warn!("message is not valid UTF-8");
                    write_response(
                        &mut writer,
                        &JsonRpcResponse::error(None, JsonRpcError::internal_error("Parse error: invalid UTF-8")),
                    )
                    .await?;
                    continue;
                }
            };

            if trimmed.is_empty() {
                continue;
            }

            let message: Value = match serde_json::from_str(trimmed) {
                Ok(v) => v,
                Err(e) => {
                    tracing::warn!(error = %e, "parse error");
                    write_response(&mut writer, &parse_error(&e)).await?;
                    continue;
                }
            };

            if is_notification(&message) {
                let method = message.get("method").and_then(Value::as_str).unwrap_or("-");
                tracing::info!(method, "notification received");
                continue;
            }

            let req: JsonRpcRequest = match serde_json::from_value(message) {
                Ok(r) => r,
                Err(e) => {
                    tracing::warn!(error = %e, "invalid request");
                    write_response(&mut writer, &parse_error(&e)).await?;
                    continue;
                }
            };

            let resp = self.handle(req).await;
            write_response(&mut writer, &resp).await?;
        }

        tracing::info!("end of input, shutting down");
        Ok(())
    }

    /// Dispatch on a separate task so a panicking handler cannot take the loop down.
    async fn handle(&self, req: JsonRpcRequest) -> JsonRpcResponse {
        let id = req.id.clone();
        let tools = Arc::clone(&self.tools);
        let config = self.config.clone();
        let task = tokio::spawn(async move { handlers::dispatch(&req, tools.as_ref(), &config).await });

        match task.await {
            Ok(resp) => resp,
            Err(join_err) => {
                tracing::error!(error = %join_err, "request handler panicked");
                JsonRpcResponse::error(id, JsonRpcError::internal_error("Internal error: request handler panicked"))
            }
        }
    }
}

fn parse_error(e: &serde_json::Error) -> JsonRpcResponse {
    JsonRpcResponse::error(None, JsonRpcError::internal_error(format!("Parse error: {e}")))
}

/// Discard input up to and including the next newline (or end of input).
async fn skip_line<R: AsyncBufRead + Unpin>(reader: &mut R) -> Result<(), ServerError> {
    loop {
        let buf = reader.fill_buf().await?;
        if buf.is_empty() {
            return Ok(());
        }
        let (used, done) = match buf.iter().position(|&b| b == b'\n') {
            Some(pos) => (pos + 1, true),
            None => (buf.len(), false),
        };
        reader.consume(used);
        if done {
            return Ok(());
        }
    }
}

async fn write_response<W: AsyncWrite + Unpin>(
    writer: &mut W,
    resp: &JsonRpcResponse,
) -> Result<(), ServerError> {
    let out = serde_json::to_string(resp)?;
    writer.write_all(out.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}
