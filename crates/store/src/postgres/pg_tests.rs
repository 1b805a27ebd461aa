//! Integration tests against a live Postgres instance.
//!
//! Gated behind `postgres-integration-tests` (never on by default) because
//! they need `DATABASE_URL` pointed at a disposable database with the
//! schema from the project's migrations already applied.

use super::*;
use cadence_core::{Project, ProjectId};

async fn test_store() -> PgStore {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for postgres-integration-tests");
    PgStore::connect(&url).await.expect("connect to test database")
}

fn sample_project() -> Project {
    Project {
        id: ProjectId::new(),
        host_repo_ref: "acme/widgets".to_string(),
        installation_id: None,
        default_branch: "main".to_string(),
        autonomy_mode: cadence_core::AutonomyMode::Assist,
        max_concurrent_branches: 3,
        risk_paths: vec!["infra/".to_string()],
        paused: false,
        merge_in_progress: false,
        scout_schedule: "0 * * * *".to_string(),
        wild_card_frequency: 0.2,
        product_context: String::new(),
        strategic_nudges: Vec::new(),
    }
}

#[tokio::test]
async fn project_round_trips_through_postgres() {
    let store = test_store().await;
    let project = sample_project();
    sqlx::query(
        "INSERT INTO projects (id, host_repo_ref, installation_id, default_branch, autonomy_mode, \
         max_concurrent_branches, risk_paths, paused, merge_in_progress, scout_schedule, \
         wild_card_frequency, product_context, strategic_nudges) \
         VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13)",
    )
    .bind(project.id.as_str())
    .bind(&project.host_repo_ref)
    .bind(&project.installation_id)
    .bind(&project.default_branch)
    .bind(project.autonomy_mode.to_string())
    .bind(project.max_concurrent_branches as i32)
    .bind(serde_json::to_value(&project.risk_paths).unwrap())
    .bind(project.paused)
    .bind(project.merge_in_progress)
    .bind(&project.scout_schedule)
    .bind(project.wild_card_frequency)
    .bind(&project.product_context)
    .bind(serde_json::to_value(&project.strategic_nudges).unwrap())
    .execute(&store.pool)
    .await
    .unwrap();

    let fetched = store.get_project(&project.id).await.unwrap();
    assert_eq!(fetched.host_repo_ref, project.host_repo_ref);
    assert_eq!(fetched.risk_paths, project.risk_paths);
}

#[tokio::test]
async fn claim_next_job_skips_locked_rows_under_concurrent_claimants() {
    let store = test_store().await;
    let project = sample_project();
    sqlx::query(
        "INSERT INTO projects (id, host_repo_ref, installation_id, default_branch, autonomy_mode, \
         max_concurrent_branches, risk_paths, paused, merge_in_progress, scout_schedule, \
         wild_card_frequency, product_context, strategic_nudges) \
         VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13)",
    )
    .bind(project.id.as_str())
    .bind(&project.host_repo_ref)
    .bind(&project.installation_id)
    .bind(&project.default_branch)
    .bind(project.autonomy_mode.to_string())
    .bind(project.max_concurrent_branches as i32)
    .bind(serde_json::to_value(&project.risk_paths).unwrap())
    .bind(project.paused)
    .bind(project.merge_in_progress)
    .bind(&project.scout_schedule)
    .bind(project.wild_card_frequency)
    .bind(&project.product_context)
    .bind(serde_json::to_value(&project.strategic_nudges).unwrap())
    .execute(&store.pool)
    .await
    .unwrap();

    let cycle = store.open_cycle(&project.id, &JobId::new(), false).await.unwrap();
    let job = Job {
        id: JobId::new(),
        project_id: project.id,
        payload: cadence_core::JobPayload::Strategize { cycle_id: cycle.id, wild_card: false },
        status: JobStatus::Pending,
        attempt_count: 0,
        worker_id: None,
        locked_at: None,
        last_error: None,
        source_run_id: None,
        github_issue_number: 0,
        created_at: Utc::now(),
        completed_at: None,
    };
    store.insert_job(&job).await.unwrap();

    let (a, b) = tokio::join!(store.claim_next_job("worker-a"), store.claim_next_job("worker-b"));
    let claimed = [a.unwrap(), b.unwrap()].into_iter().flatten().count();
    assert_eq!(claimed, 1, "exactly one worker should have claimed the single pending job");
}
