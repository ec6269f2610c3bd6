//! MCP servers for X (Twitter) and GitHub issues.
//!
//! Exposes a fixed tool registry over newline-delimited JSON-RPC 2.0 on
//! stdio. The X tools sign every request with OAuth 1.0a (see [`oauth`]);
//! the GitHub tools use a bearer token and the project-board GraphQL API.

pub mod clients;
pub mod config;
pub mod error;
pub mod handlers;
pub mod oauth;
pub mod protocol;
pub mod server;
pub mod tools;

pub mod schema;
