// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::Parser;
use tracing::{info, warn};

/// kandev daemon: loads the agent registry, syncs default profiles, and
/// waits. Session transport/executor wiring is driven by whatever host
/// process supplies a real `AgentManagerClient` — this binary only proves
/// the collaborators this crate owns construct and boot cleanly.
#[derive(Debug, Parser)]
#[command(name = "kandevd", version)]
struct Args {
    /// Print the resolved state directory and registered agents, then exit.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    kandev_daemon::init_tracing();
    let args = Args::parse();

    let daemon = match kandev_daemon::bootstrap().await {
        Ok(daemon) => daemon,
        Err(err) => {
            tracing::error!(error = %err, "daemon failed to start");
            return std::process::ExitCode::FAILURE;
        }
    };

    info!(
        state_dir = %daemon.config.state_dir.display(),
        agents = daemon.registry.list_enabled().len(),
        "kandev daemon ready"
    );

    if args.check {
        for agent in daemon.registry.list_enabled() {
            println!("{}\t{}", agent.id, agent.resolved_display_name());
        }
        return std::process::ExitCode::SUCCESS;
    }

    if tokio::signal::ctrl_c().await.is_err() {
        warn!("failed to install ctrl-c handler; exiting immediately");
    }
    info!("shutting down");
    std::process::ExitCode::SUCCESS
}
