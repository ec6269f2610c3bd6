use std::sync::Arc;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use mcp_servers::clients::{GitHubClient, XClient};
use mcp_servers::config::{GitHubConfig, ServerConfig, XConfig};
use mcp_servers::server::McpServer;
use mcp_servers::tools::{IssueTools, SocialTools, ToolSet};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ServerKind {
    /// X (Twitter) posting and timeline tools
    Twitter,
    /// GitHub issue and project-board tools
    Github,
}

#[derive(Parser, Debug)]
#[command(name = "mcp-servers", version)]
#[command(about = "MCP server for X and GitHub issues over stdio")]
struct Args {
    /// Which tool registry to serve
    #[arg(long, env = "MCP_SERVER", value_enum, default_value = "twitter")]
    server: ServerKind,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let args = Args::parse();

    let config = match ServerConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("mcp-servers: configuration error: {e}");
            std::process::exit(1);
        }
    };

    let tools = match build_tools(args.server, &config) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("mcp-servers: configuration error: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!(server = ?args.server, "starting MCP server");
    let server = McpServer::new(tools, config);
    if let Err(e) = server.run().await {
        eprintln!("mcp-servers: fatal error: {e}");
        std::process::exit(1);
    }
}

fn build_tools(kind: ServerKind, server: &ServerConfig) -> Result<Arc<dyn ToolSet>, Box<dyn std::error::Error>> {
    let http_timeout = server.http_timeout;

    let tools: Arc<dyn ToolSet> = match kind {
        ServerKind::Twitter => {
            let config = XConfig::from_env()?;
            Arc::new(SocialTools::new(XClient::new(&config, http_timeout)?))
        }
        ServerKind::Github => {
            let config = GitHubConfig::from_env()?;
            let board = config.board.clone();
            Arc::new(IssueTools::new(GitHubClient::new(&config, http_timeout)?, board))
        }
    };
    Ok(tools)
}
