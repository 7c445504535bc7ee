// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn sandbox_args_always_present() {
    let args = build_command_args(&[]);
    assert_eq!(
        args,
        vec![
            "-c".to_string(),
            "sandbox_mode=\"workspace-write\"".to_string(),
            "-c".to_string(),
            "sandbox_workspace_write.network_access=true".to_string(),
        ]
    );
}

#[test]
fn http_server_rewrites_sse_suffix() {
    let servers = vec![McpServerConfig {
        name: "Docs Server".to_string(),
        transport: McpTransport::Http { url: "https://mcp.example.com/sse".to_string() },
    }];
    let args = build_command_args(&servers);
    assert!(args.contains(&"mcp_servers.Docs_Server.url=\"https://mcp.example.com/mcp\"".to_string()));
}

#[test]
fn stdio_server_includes_args_as_toml_array() {
    let servers = vec![McpServerConfig {
        name: "fs".to_string(),
        transport: McpTransport::Stdio {
            command: "npx".to_string(),
            args: vec!["-y".to_string(), "mcp-fs".to_string()],
        },
    }];
    let args = build_command_args(&servers);
    assert!(args.contains(&"mcp_servers.fs.command=\"npx\"".to_string()));
    assert!(args.contains(&"mcp_servers.fs.args=[\"-y\",\"mcp-fs\"]".to_string()));
}

#[test]
fn empty_name_slugifies_to_server() {
    let servers = vec![McpServerConfig {
        name: String::new(),
        transport: McpTransport::Stdio { command: "x".to_string(), args: vec![] },
    }];
    let args = build_command_args(&servers);
    assert!(args.contains(&"mcp_servers.server.command=\"x\"".to_string()));
}

#[test]
fn non_alphanumeric_chars_become_underscores() {
    assert_eq!(slugify("Docs Server"), "Docs_Server");
    assert_eq!(slugify("!!!"), "___");
}
