use crate::services::{Fleet, RunControl};
use gitfleet_core::classify::{format_elapsed, Attempt};
use gitfleet_core::domain::{ExecKind, Outcome, RepoHandle};
use gitfleet_core::pool::RunReport;
use gitfleet_core::ports::ExecRequest;

impl Fleet {
    /// Run an arbitrary command in each repository under the deadline.
    /// `argv` must be non-empty; `Command::validate` checks this.
    pub async fn exec(
        &self,
        repos: &[RepoHandle],
        argv: &[String],
        control: &RunControl,
    ) -> RunReport<Outcome<ExecKind>> {
        let Some((program, args)) = argv.split_first() else {
            return RunReport::empty();
        };

        self.pool(control)
            .run(repos, |repo, _| self.exec_one(repo, program, args))
            .await
    }

    async fn exec_one(
        &self,
        repo: &RepoHandle,
        program: &str,
        args: &[String],
    ) -> Outcome<ExecKind> {
        let req = ExecRequest::new(program, args.iter().cloned()).cwd(repo.path());

        // Exit status is the only signal; arbitrary output is not classified
        match self.runner.attempt(req).await {
            Attempt::Completed(output) if output.success() => {
                Outcome::new(repo.name(), ExecKind::Ok).with_detail(output.stdout.trim_end())
            }
            Attempt::Completed(output) => {
                let code = output
                    .exit_code
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "signal".to_string());
                let message = output.combined();
                let error = if message.is_empty() {
                    format!("exit {}", code)
                } else {
                    format!("exit {}: {}", code, message)
                };
                Outcome::new(repo.name(), ExecKind::Error).with_error(error)
            }
            Attempt::TimedOut { elapsed } => Outcome::new(repo.name(), ExecKind::Error)
                .with_error("timeout")
                .with_detail(format!("timed out after {}", format_elapsed(elapsed))),
            Attempt::Failed(error) => Outcome::new(repo.name(), ExecKind::Error).with_error(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::fleet_with;
    use super::*;
    use crate::adapters::testing::ScriptedProcess;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_exec_runs_in_each_repo() {
        let (fleet, process) =
            fleet_with(ScriptedProcess::new().ok("log -1 --format=%s", "init\n"));
        let repos = vec![RepoHandle::new("/src/a"), RepoHandle::new("/src/b")];

        let report = fleet
            .exec(&repos, &argv(&["git", "log", "-1", "--format=%s"]), &RunControl::new())
            .await;
        assert!(report
            .iter()
            .all(|o| o.kind == ExecKind::Ok && o.detail.as_deref() == Some("init")));

        let mut dirs: Vec<_> = process.calls().into_iter().filter_map(|c| c.cwd).collect();
        dirs.sort();
        assert_eq!(dirs, vec![std::path::PathBuf::from("/src/a"), "/src/b".into()]);
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_an_error_even_with_known_wording() {
        let process = ScriptedProcess::new().respond("check", 3, "Already up to date.\n", "");
        let (fleet, _) = fleet_with(process);

        let report = fleet
            .exec(&[RepoHandle::new("/src/a")], &argv(&["make", "check"]), &RunControl::new())
            .await;
        let outcome = report.results[0].as_ref().unwrap();
        assert_eq!(outcome.kind, ExecKind::Error);
        assert_eq!(outcome.error.as_deref(), Some("exit 3: Already up to date."));
    }

    #[tokio::test]
    async fn test_empty_argv_runs_nothing() {
        let (fleet, process) = fleet_with(ScriptedProcess::new());
        let report = fleet.exec(&[RepoHandle::new("/src/a")], &[], &RunControl::new()).await;
        assert_eq!(report.total(), 0);
        assert!(process.calls().is_empty());
    }
}
