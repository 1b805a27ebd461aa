// SPDX-License-Identifier: MIT

//! Worker child-process lifecycle: spawn, stream output, restart with
//! backoff, and a graceful SIGTERM→grace→SIGKILL shutdown — the same
//! scoped-resource-with-guaranteed-release shape as the merge lock guard,
//! applied to an OS process instead of a store row.

use std::process::Stdio;
use std::time::Duration;

use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, ChildStderr, ChildStdout, Command};
use tracing::{info, warn};

/// How long a worker is given to exit after SIGTERM before SIGKILL.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// `5s × 2^n`, capped at `max`.
pub fn restart_backoff(restart_count: u32, max: Duration) -> Duration {
    let secs = 5u64.saturating_mul(1u64 << restart_count.min(16));
    Duration::from_secs(secs).min(max)
}

/// Spawns `program` with `args`, piping stdout/stderr so the caller can
/// stream and classify lines.
pub fn spawn_worker(program: &str, args: &[String]) -> std::io::Result<Child> {
    Command::new(program).args(args).stdout(Stdio::piped()).stderr(Stdio::piped()).kill_on_drop(true).spawn()
}

/// Takes the child's piped stdio handles so they can be streamed
/// concurrently with the caller awaiting `child.wait()` on the same child.
pub fn take_output(child: &mut Child) -> (Option<ChildStdout>, Option<ChildStderr>) {
    (child.stdout.take(), child.stderr.take())
}

/// Drains previously-taken stdout/stderr handles, logging each line at a
/// level derived from simple substring classification. Returns once both
/// streams close (normally meaning the child has exited).
pub async fn stream_taken_output(stdout: Option<ChildStdout>, stderr: Option<ChildStderr>) {
    let stdout_task = stdout.map(|out| {
        tokio::spawn(async move {
            let mut lines = BufReader::new(out).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                classify_and_log(&line, false);
            }
        })
    });
    let stderr_task = stderr.map(|err| {
        tokio::spawn(async move {
            let mut lines = BufReader::new(err).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                classify_and_log(&line, true);
            }
        })
    });

    if let Some(task) = stdout_task {
        let _ = task.await;
    }
    if let Some(task) = stderr_task {
        let _ = task.await;
    }
}

/// Convenience wrapper for callers (and tests) that don't need to `wait()`
/// on the child concurrently with draining its output.
pub async fn stream_output(child: &mut Child) {
    let (stdout, stderr) = take_output(child);
    stream_taken_output(stdout, stderr).await;
}

fn classify_and_log(line: &str, from_stderr: bool) {
    let lower = line.to_lowercase();
    if lower.contains("error") || lower.contains("panic") || from_stderr {
        warn!(target: "worker_child", "{line}");
    } else {
        info!(target: "worker_child", "{line}");
    }
}

/// Sends SIGTERM, waits up to `grace`, then SIGKILL if the child hasn't exited.
pub async fn shutdown_gracefully(child: &mut Child, grace: Duration) -> std::io::Result<()> {
    if let Some(pid) = child.id() {
        let _ = kill(Pid::from_raw(pid as i32), Signal::SIGTERM);
    }

    match tokio::time::timeout(grace, child.wait()).await {
        Ok(result) => result.map(|_| ()),
        Err(_) => {
            warn!("worker did not exit within the grace period, sending SIGKILL");
            child.kill().await
        }
    }
}

/// Whether the child exit reflects an operator-requested shutdown (the
/// supervisor itself killed it) rather than a crash that should be restarted.
pub fn is_graceful_exit(status: std::process::ExitStatus) -> bool {
    status.success()
}

#[cfg(test)]
#[path = "child_tests.rs"]
mod tests;
