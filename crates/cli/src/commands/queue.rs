// SPDX-License-Identifier: MIT

use anyhow::Result;
use cadence_core::{JobStatus, ProjectId};
use cadence_store::Store;
use cadence_wire::{JobSummary, QueueDepth};
use clap::Subcommand;

use crate::wiring;

#[derive(Subcommand)]
pub enum QueueCommand {
    /// Print job counts by status across every project.
    Ls,
    /// List jobs for one project, optionally filtered by status.
    Show {
        #[arg(long)]
        project: String,
        #[arg(long, value_enum)]
        status: Option<Status>,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
pub enum Status {
    Pending,
    Processing,
    Done,
    Failed,
}

impl From<Status> for JobStatus {
    fn from(s: Status) -> Self {
        match s {
            Status::Pending => JobStatus::Pending,
            Status::Processing => JobStatus::Processing,
            Status::Done => JobStatus::Done,
            Status::Failed => JobStatus::Failed,
        }
    }
}

pub async fn run(command: QueueCommand) -> Result<()> {
    let database_url = std::env::var("DATABASE_URL")?;
    let store = wiring::connect_store(&database_url).await?;

    match command {
        QueueCommand::Ls => {
            let depth: QueueDepth = store.job_counts().await?.into();
            println!("{}", serde_json::to_string_pretty(&depth)?);
        }
        QueueCommand::Show { project, status } => {
            let project_id = ProjectId::from_string(&project);
            let statuses =
                status.map(|s| vec![s.into()]).unwrap_or_else(|| vec![JobStatus::Pending, JobStatus::Processing]);

            let mut jobs = Vec::new();
            for s in statuses {
                jobs.extend(store.list_jobs_by_status(s).await?.into_iter().filter(|j| j.project_id == project_id));
            }

            let summaries: Vec<JobSummary> = jobs.iter().map(JobSummary::from).collect();
            println!("{}", serde_json::to_string_pretty(&summaries)?);
        }
    }
    Ok(())
}
