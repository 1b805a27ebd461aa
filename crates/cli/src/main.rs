// SPDX-License-Identifier: MIT

//! `cadence` — thin operator CLI. A client of the same Store the worker and
//! supervisor talk to: process control (`worker run`, `supervisor run`) and
//! read-only inspection (`queue ls/show`, `project pause/resume`). No
//! bespoke protocol, no daemon listener.

mod commands;
mod wiring;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "cadence", version, about = "Operate the cadence worker/supervisor")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the worker poll loop in the foreground.
    Worker {
        #[command(subcommand)]
        command: commands::worker::WorkerCommand,
    },
    /// Run the supervisor in the foreground.
    Supervisor {
        #[command(subcommand)]
        command: commands::supervisor::SupervisorCommand,
    },
    /// Inspect the job queue.
    Queue {
        #[command(subcommand)]
        command: commands::queue::QueueCommand,
    },
    /// Pause or resume a project's autonomy.
    Project {
        #[command(subcommand)]
        command: commands::project::ProjectCommand,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Worker { command } => commands::worker::run(command).await,
        Command::Supervisor { command } => commands::supervisor::run(command).await,
        Command::Queue { command } => commands::queue::run(command).await,
        Command::Project { command } => commands::project::run(command).await,
    }
}
