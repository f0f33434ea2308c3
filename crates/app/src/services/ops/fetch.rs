use crate::services::fleet::{failure, remote_git};
use crate::services::{Fleet, RunControl};
use gitfleet_core::domain::{FetchKind, Outcome, RepoHandle};
use gitfleet_core::pool::RunReport;

impl Fleet {
    pub async fn fetch(
        &self,
        repos: &[RepoHandle],
        prune: bool,
        control: &RunControl,
    ) -> RunReport<Outcome<FetchKind>> {
        self.pool(control)
            .run(repos, |repo, _| self.fetch_one(repo, prune))
            .await
    }

    async fn fetch_one(&self, repo: &RepoHandle, prune: bool) -> Outcome<FetchKind> {
        let mut args = vec!["fetch", "--all"];
        if prune {
            args.push("--prune");
        }

        let verdict = self.runner.run(remote_git(args).cwd(repo.path())).await;
        if !verdict.is_success() {
            return failure(repo.name(), FetchKind::Error, &verdict);
        }

        // Ref updates are reported as `old..new  branch -> origin/branch`
        let updated = verdict
            .output()
            .map(|out| out.lines().filter(|line| line.contains("->")).count())
            .unwrap_or(0);

        if updated == 0 {
            Outcome::new(repo.name(), FetchKind::UpToDate)
        } else {
            Outcome::new(repo.name(), FetchKind::Fetched)
                .with_detail(format!("{} refs updated", updated))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::fleet_with;
    use crate::adapters::testing::ScriptedProcess;
    use crate::services::RunControl;
    use gitfleet_core::domain::{FetchKind, RepoHandle};

    #[tokio::test]
    async fn test_fetch_counts_updated_refs() {
        let process = ScriptedProcess::new().respond(
            "fetch --all --prune",
            0,
            "Fetching origin\n",
            "From github.com:acme/api\n   1a2b..3c4d  main       -> origin/main\n * [new branch]      dev -> origin/dev\n",
        );
        let (fleet, _) = fleet_with(process);

        let report = fleet.fetch(&[RepoHandle::new("/src/api")], true, &RunControl::new()).await;
        let outcome = report.results[0].as_ref().unwrap();
        assert_eq!(outcome.kind, FetchKind::Fetched);
        assert_eq!(outcome.detail.as_deref(), Some("2 refs updated"));
    }

    #[tokio::test]
    async fn test_fetch_without_updates_is_up_to_date() {
        let (fleet, process) =
            fleet_with(ScriptedProcess::new().ok("fetch --all", "Fetching origin\n"));

        let report = fleet.fetch(&[RepoHandle::new("/src/api")], false, &RunControl::new()).await;
        assert_eq!(report.results[0].as_ref().unwrap().kind, FetchKind::UpToDate);
        assert_eq!(process.call_args(), vec!["fetch --all"]);
    }

    #[tokio::test]
    async fn test_fetch_failure_keeps_output() {
        let process =
            ScriptedProcess::new().respond("fetch --all", 1, "", "fatal: bad config line 3");
        let (fleet, _) = fleet_with(process);

        let report = fleet.fetch(&[RepoHandle::new("/src/api")], false, &RunControl::new()).await;
        let outcome = report.results[0].as_ref().unwrap();
        assert_eq!(outcome.kind, FetchKind::Error);
        assert_eq!(outcome.error.as_deref(), Some("fatal: bad config line 3"));
    }
}
