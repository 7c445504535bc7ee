// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Translates the MCP server table into the repeated `-c key=value` CLI args
//! Codex expects at process launch.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum McpTransport {
    Http { url: String },
    Stdio { command: String, args: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct McpServerConfig {
    pub name: String,
    pub transport: McpTransport,
}

/// Lowercases nothing (names are taken as-is); replaces any character that
/// isn't alphanumeric, `_`, or `-` with `_`. An empty result becomes
/// `"server"`.
fn slugify(name: &str) -> String {
    let slug: String =
        name.chars().map(|c| if c.is_alphanumeric() || c == '_' || c == '-' { c } else { '_' }).collect();
    if slug.is_empty() {
        "server".to_string()
    } else {
        slug
    }
}

/// Rewrites a trailing `/sse` path segment to `/mcp`, per the transport's
/// HTTP/SSE-to-streamable-HTTP convention.
fn normalize_http_url(url: &str) -> String {
    url.strip_suffix("/sse").map(|base| format!("{base}/mcp")).unwrap_or_else(|| url.to_string())
}

/// Builds the deterministic `-c key=value` args for the given servers, with
/// sandbox policy always forced to workspace-write + network access.
pub fn build_command_args(servers: &[McpServerConfig]) -> Vec<String> {
    let mut args = vec![
        "-c".to_string(),
        "sandbox_mode=\"workspace-write\"".to_string(),
        "-c".to_string(),
        "sandbox_workspace_write.network_access=true".to_string(),
    ];

    for server in servers {
        let slug = slugify(&server.name);
        match &server.transport {
            McpTransport::Http { url } => {
                args.push("-c".to_string());
                args.push(format!("mcp_servers.{slug}.url=\"{}\"", normalize_http_url(url)));
            }
            McpTransport::Stdio { command, args: cmd_args } => {
                args.push("-c".to_string());
                args.push(format!("mcp_servers.{slug}.command=\"{command}\""));
                if !cmd_args.is_empty() {
                    let toml_array = cmd_args
                        .iter()
                        .map(|a| format!("\"{a}\""))
                        .collect::<Vec<_>>()
                        .join(",");
                    args.push("-c".to_string());
                    args.push(format!("mcp_servers.{slug}.args=[{toml_array}]"));
                }
            }
        }
    }
    args
}

#[cfg(test)]
#[path = "mcp_tests.rs"]
mod tests;
