// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::{Parser, Subcommand};
use kandev_settings::{build_command_preview, ProfileStore};
use std::collections::BTreeMap;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "kandev", version, about = "Inspect and preview registered coding agents")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List every enabled agent and whether it's available on this host.
    List,
    /// Print the command a profile would launch, without running it.
    Preview {
        /// Registered agent id, e.g. `codex`.
        agent_id: String,
    },
    /// Re-run the profile-sync pass against the current registry.
    Sync,
}

#[tokio::main]
async fn main() -> ExitCode {
    kandev_daemon::init_tracing();
    let cli = Cli::parse();

    let daemon = match kandev_daemon::bootstrap().await {
        Ok(daemon) => daemon,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Command::List => {
            let now_ms = 0;
            for agent in daemon.availability.list_available_agents(now_ms).await {
                println!(
                    "{}\t{}\t{}",
                    agent.id,
                    agent.display_name,
                    if agent.available { "available" } else { "not found" }
                );
            }
            ExitCode::SUCCESS
        }
        Command::Preview { agent_id } => {
            let agent_id = kandev_core::AgentId::new(agent_id);
            let Some(agent) = daemon.registry.get(&agent_id) else {
                eprintln!("error: no agent registered with id {agent_id}");
                return ExitCode::FAILURE;
            };
            let profiles = daemon.profiles.list_profiles(&agent_id).await;
            let Some(profile) = profiles.into_iter().next() else {
                eprintln!("error: no profile for {agent_id}; run `kandev sync` first");
                return ExitCode::FAILURE;
            };
            let preview =
                build_command_preview(&agent, &profile, &BTreeMap::new(), profile.cli_passthrough);
            println!("{}", preview.shell_string);
            ExitCode::SUCCESS
        }
        Command::Sync => {
            eprintln!("agent profiles synced at startup; {} agent(s) registered", daemon.registry.list_enabled().len());
            ExitCode::SUCCESS
        }
    }
}
