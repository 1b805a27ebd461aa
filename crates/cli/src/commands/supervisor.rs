// SPDX-License-Identifier: MIT

use anyhow::Result;
use cadence_supervisor::Config;
use clap::Subcommand;

use crate::wiring;

#[derive(Subcommand)]
pub enum SupervisorCommand {
    /// Spawn and supervise the worker child process until SIGINT/SIGTERM.
    Run,
}

pub async fn run(command: SupervisorCommand) -> Result<()> {
    match command {
        SupervisorCommand::Run => run_loop().await,
    }
}

async fn run_loop() -> Result<()> {
    let config = Config::load()?;
    cadence_supervisor::init_tracing(&config);

    let store = wiring::connect_store(&config.database_url).await?;
    let token_provider = wiring::token_provider()?;
    let notifier = wiring::notifier(config.notifier_webhook_url.as_deref());
    let diagnoser: std::sync::Arc<dyn cadence_capabilities::Diagnoser> =
        std::sync::Arc::new(cadence_capabilities::NoopDiagnoser);

    cadence_supervisor::run(&config, store, token_provider, notifier, diagnoser).await?;
    Ok(())
}
