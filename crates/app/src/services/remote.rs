use gitfleet_core::classify::{classify, format_elapsed, Attempt, RuleSet, Verdict};
use gitfleet_core::ports::{ExecRequest, ProcessPort};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;
use tracing::warn;

/// The deadline passed before the operation finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("timed out after {}", elapsed_text(.elapsed))]
pub struct TimedOut {
    pub elapsed: Duration,
}

fn elapsed_text(elapsed: &Duration) -> String {
    format_elapsed(*elapsed)
}

/// Race `operation` against a deadline.
///
/// On expiry the operation future is dropped. Whatever it owned is dropped
/// with it; for a subprocess that means the child is abandoned unless it was
/// started with `kill_on_timeout`.
pub async fn with_timeout<F: Future>(
    operation: F,
    timeout: Duration,
) -> Result<F::Output, TimedOut> {
    let started = Instant::now();
    tokio::time::timeout(timeout, operation)
        .await
        .map_err(|_| TimedOut {
            elapsed: started.elapsed(),
        })
}

/// Runs subprocesses under a deadline and classifies how they ended
#[derive(Clone)]
pub struct RemoteRunner {
    process: Arc<dyn ProcessPort>,
    timeout: Duration,
    kill_on_timeout: bool,
    rules: Arc<RuleSet>,
}

impl RemoteRunner {
    pub fn new(process: Arc<dyn ProcessPort>, timeout: Duration) -> Self {
        Self {
            process,
            timeout,
            kill_on_timeout: false,
            rules: Arc::new(RuleSet::default()),
        }
    }

    /// Kill children that outlive the deadline instead of abandoning them
    pub fn with_kill_on_timeout(mut self, kill: bool) -> Self {
        self.kill_on_timeout = kill;
        self
    }

    /// Run the request under the deadline without classifying the result
    pub async fn attempt(&self, req: ExecRequest) -> Attempt {
        let req = req.kill_on_timeout(self.kill_on_timeout);
        let command = req.display();

        match with_timeout(self.process.exec(req), self.timeout).await {
            Ok(Ok(output)) => Attempt::Completed(output),
            Ok(Err(err)) => Attempt::Failed(err.to_string()),
            Err(timed_out) => {
                warn!(
                    "`{}` {}; child {}",
                    command,
                    timed_out,
                    if self.kill_on_timeout { "killed" } else { "left running" }
                );
                Attempt::TimedOut {
                    elapsed: timed_out.elapsed,
                }
            }
        }
    }

    pub async fn run(&self, req: ExecRequest) -> Verdict {
        classify(&self.attempt(req).await, &self.rules)
    }

    /// Like `run`, classifying against a caller-supplied rule table
    pub async fn run_with(&self, req: ExecRequest, rules: &RuleSet) -> Verdict {
        classify(&self.attempt(req).await, rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::testing::ScriptedProcess;

    #[tokio::test(start_paused = true)]
    async fn test_with_timeout_reports_elapsed() {
        let result = with_timeout(
            tokio::time::sleep(Duration::from_secs(10)),
            Duration::from_secs(2),
        )
        .await;

        let err = result.unwrap_err();
        assert_eq!(err.elapsed, Duration::from_secs(2));
        assert_eq!(err.to_string(), "timed out after 2s");
    }

    #[tokio::test(start_paused = true)]
    async fn test_with_timeout_passes_value_through() {
        let result = with_timeout(async { 7 }, Duration::from_secs(1)).await;
        assert_eq!(result, Ok(7));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_command_times_out() {
        let process = ScriptedProcess::new()
            .ok("fetch --all", "")
            .delay("fetch --all", Duration::from_secs(120));
        let runner = RemoteRunner::new(Arc::new(process), Duration::from_secs(30));

        let verdict = runner.run(ExecRequest::git(["fetch", "--all"])).await;
        assert_eq!(
            verdict,
            Verdict::TimedOut {
                elapsed: Duration::from_secs(30)
            }
        );
    }

    #[tokio::test]
    async fn test_connection_failure_is_classified() {
        let process = ScriptedProcess::new().respond(
            "pull --ff-only",
            1,
            "",
            "ssh: connect to host github.com port 22: Network is unreachable\nfatal: Could not read from remote repository.",
        );
        let runner = RemoteRunner::new(Arc::new(process), Duration::from_secs(30));

        let verdict = runner.run(ExecRequest::git(["pull", "--ff-only"])).await;
        assert_eq!(verdict, Verdict::Connection);
    }

    #[tokio::test]
    async fn test_spawn_failure_becomes_failed_verdict() {
        let process = ScriptedProcess::new().spawn_error("status", "No such file or directory");
        let runner = RemoteRunner::new(Arc::new(process), Duration::from_secs(5));

        let verdict = runner.run(ExecRequest::git(["status"])).await;
        assert!(matches!(verdict, Verdict::Failed { output } if output.contains("No such file")));
    }

    #[tokio::test]
    async fn test_local_rules_keep_the_raw_diagnostic() {
        let process = ScriptedProcess::new().respond(
            "checkout dev",
            128,
            "",
            "fatal: Could not read from remote repository.",
        );
        let runner = RemoteRunner::new(Arc::new(process), Duration::from_secs(5));

        let verdict = runner
            .run_with(ExecRequest::git(["checkout", "dev"]), &RuleSet::local())
            .await;
        assert_eq!(
            verdict,
            Verdict::Failed {
                output: "fatal: Could not read from remote repository.".into()
            }
        );
    }

    #[tokio::test]
    async fn test_kill_flag_is_forwarded_to_the_process() {
        let process = Arc::new(ScriptedProcess::new().ok("fetch", ""));
        let runner =
            RemoteRunner::new(process.clone(), Duration::from_secs(5)).with_kill_on_timeout(true);

        runner.run(ExecRequest::git(["fetch"])).await;
        assert!(process.calls()[0].kill_on_timeout);
    }
}
