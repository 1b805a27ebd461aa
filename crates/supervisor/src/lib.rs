// SPDX-License-Identifier: MIT

//! The supervisor: spawns the worker as a child process, restarts it with
//! backoff on an unexpected exit, and runs the periodic health sweep and
//! digest that keep the queue moving even when the worker itself goes quiet.

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod child;
mod config;
mod digest;
mod error;
mod health;

pub use child::{
    is_graceful_exit, restart_backoff, shutdown_gracefully, spawn_worker, stream_output, take_output,
    SHUTDOWN_GRACE,
};
pub use config::{Config, ConfigError};
pub use digest::{publish_digest, DigestStats};
pub use error::{SupervisorError, SupervisorResult};
pub use health::{run_health_sweep, HealthReport};

use std::sync::Arc;
use std::time::Instant;

use cadence_capabilities::{Diagnoser, Notifier, TokenProvider};
use cadence_store::Store;
use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info, warn};

pub fn init_tracing(config: &Config) {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_new(&config.tracing_filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Runs the supervisor loop until it receives SIGTERM or SIGINT. Spawns and
/// restarts the worker subprocess, and ticks the health sweep and digest on
/// their own intervals.
pub async fn run(
    config: &Config,
    store: Arc<dyn Store>,
    token_provider: Arc<dyn TokenProvider>,
    notifier: Arc<dyn Notifier>,
    diagnoser: Arc<dyn Diagnoser>,
) -> SupervisorResult<()> {
    let started_at = Instant::now();
    let mut restart_count: u32 = 0;
    let mut sigterm = signal(SignalKind::terminate()).map_err(SupervisorError::Child)?;

    let mut running_child =
        child::spawn_worker(&config.worker_program, &config.worker_args).map_err(SupervisorError::Child)?;
    let (stdout, stderr) = child::take_output(&mut running_child);
    tokio::spawn(child::stream_taken_output(stdout, stderr));

    let mut health_tick = tokio::time::interval(config.health_interval);
    let mut digest_tick = tokio::time::interval(config.digest_interval);

    loop {
        tokio::select! {
            exit = running_child.wait() => {
                match exit {
                    Ok(status) if child::is_graceful_exit(status) => {
                        info!("worker exited cleanly, stopping supervisor");
                        break;
                    }
                    Ok(status) => {
                        warn!(%status, restart_count, "worker exited unexpectedly, restarting");
                        restart_count += 1;
                        tokio::time::sleep(child::restart_backoff(restart_count, config.max_backoff)).await;
                        running_child = child::spawn_worker(&config.worker_program, &config.worker_args)
                            .map_err(SupervisorError::Child)?;
                        let (stdout, stderr) = child::take_output(&mut running_child);
                        tokio::spawn(child::stream_taken_output(stdout, stderr));
                    }
                    Err(e) => {
                        error!(error = %e, "failed to wait on worker child");
                        return Err(SupervisorError::Child(e));
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("received SIGINT, shutting down worker");
                let _ = child::shutdown_gracefully(&mut running_child, config.shutdown_grace).await;
                break;
            }
            _ = sigterm.recv() => {
                info!("received SIGTERM, shutting down worker");
                let _ = child::shutdown_gracefully(&mut running_child, config.shutdown_grace).await;
                break;
            }
            _ = health_tick.tick() => {
                match health::run_health_sweep(
                    store.as_ref(),
                    token_provider.as_ref(),
                    notifier.as_ref(),
                    diagnoser.as_ref(),
                    config.stale_threshold,
                    config.max_attempts,
                    config.merge_lock_threshold,
                    config.wild_card_frequency,
                ).await {
                    Ok(report) => info!(?report, "health sweep"),
                    Err(e) => warn!(error = %e, "health sweep failed"),
                }
            }
            _ = digest_tick.tick() => {
                let stats = DigestStats { uptime: started_at.elapsed(), restart_count };
                if let Err(e) = digest::publish_digest(store.as_ref(), notifier.as_ref(), &stats).await {
                    warn!(error = %e, "digest failed");
                }
            }
        }
    }

    Ok(())
}
