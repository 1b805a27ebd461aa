// SPDX-License-Identifier: MIT

use std::sync::atomic::AtomicBool;

use anyhow::Result;
use cadence_worker::{Config, StageDispatch};
use clap::Subcommand;

use crate::wiring;

#[derive(Subcommand)]
pub enum WorkerCommand {
    /// Run the poll loop in the foreground until SIGINT/SIGTERM.
    Run {
        /// Identifier recorded on claimed jobs; defaults to the process id.
        #[arg(long)]
        worker_id: Option<String>,
    },
}

pub async fn run(command: WorkerCommand) -> Result<()> {
    match command {
        WorkerCommand::Run { worker_id } => run_loop(worker_id).await,
    }
}

async fn run_loop(worker_id: Option<String>) -> Result<()> {
    let config = Config::load()?;
    cadence_worker::init_tracing(&config);

    let worker_id = worker_id.unwrap_or_else(|| format!("worker-{}", std::process::id()));
    let store = wiring::connect_store(&config.database_url).await?;
    let repo_host = wiring::repo_host()?;
    let token_provider = wiring::token_provider()?;
    let notifier = wiring::notifier(config.notifier_webhook_url.as_deref());

    // Stage bodies (the agent harness that actually writes code) are out of
    // scope here; the dispatch table is wired up empty, so every claimed job
    // fails immediately with "no stage worker registered" until real stages
    // are registered.
    let dispatch = StageDispatch::new();
    let paused = AtomicBool::new(false);

    let result =
        cadence_worker::run(&worker_id, &config, store, repo_host, token_provider, notifier, &dispatch, &paused)
            .await;

    match result {
        Ok(()) => Ok(()),
        Err(category) => anyhow::bail!("worker loop exited: {category:?}"),
    }
}
