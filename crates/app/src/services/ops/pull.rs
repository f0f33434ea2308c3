use crate::services::fleet::{failure, remote_git, skipped};
use crate::services::{Fleet, RunControl};
use gitfleet_core::classify::{files_changed, Signal, Verdict};
use gitfleet_core::domain::{Outcome, PullKind, RepoHandle};
use gitfleet_core::pool::RunReport;
use tracing::debug;

impl Fleet {
    /// Fast-forward every repository that is clean and tracks an upstream
    pub async fn pull(
        &self,
        repos: &[RepoHandle],
        control: &RunControl,
    ) -> RunReport<Outcome<PullKind>> {
        self.pool(control)
            .run(repos, |repo, _| self.pull_one(repo))
            .await
    }

    async fn pull_one(&self, repo: &RepoHandle) -> Outcome<PullKind> {
        let name = repo.name();
        let status = self.prober.probe(repo).await;

        if !status.is_clean() {
            return skipped(name, PullKind::Skipped, "uncommitted changes");
        }
        if !status.has_upstream {
            return skipped(name, PullKind::Skipped, "no upstream configured");
        }

        let verdict = self
            .runner
            .run(remote_git(["pull", "--ff-only"]).cwd(repo.path()))
            .await;
        debug!("pull {}: {:?}", name, verdict);

        match verdict {
            Verdict::Signal {
                signal: Signal::UpToDate,
                ..
            } => Outcome::new(name, PullKind::UpToDate),
            Verdict::Succeeded { output } => {
                let outcome = Outcome::new(name, PullKind::Updated);
                match files_changed(&output) {
                    Some(1) => outcome.with_detail("1 file changed"),
                    Some(count) => outcome.with_detail(format!("{} files changed", count)),
                    None => outcome,
                }
            }
            other => failure(name, PullKind::Error, &other),
        }
    }
}
