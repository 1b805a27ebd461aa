// SPDX-License-Identifier: MIT

use anyhow::Result;
use cadence_core::ProjectId;
use cadence_store::Store;
use cadence_wire::ProjectSummary;
use clap::Subcommand;

use crate::wiring;

#[derive(Subcommand)]
pub enum ProjectCommand {
    /// Pause autonomy for a project: the supervisor's idle sweep and the
    /// worker both skip it until resumed.
    Pause { project: String },
    /// Resume autonomy for a paused project.
    Resume { project: String },
}

pub async fn run(command: ProjectCommand) -> Result<()> {
    let database_url = std::env::var("DATABASE_URL")?;
    let store = wiring::connect_store(&database_url).await?;

    let (project, paused) = match command {
        ProjectCommand::Pause { project } => (project, true),
        ProjectCommand::Resume { project } => (project, false),
    };

    let project_id = ProjectId::from_string(&project);
    let mut record = store.get_project(&project_id).await?;
    record.paused = paused;
    store.update_project(&record).await?;

    let summary = ProjectSummary::from(&record);
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
