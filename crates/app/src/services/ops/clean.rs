use crate::services::fleet::{failure, skipped};
use crate::services::{Fleet, RunControl};
use gitfleet_core::domain::{CleanKind, Outcome, RepoHandle};
use gitfleet_core::pool::RunReport;
use gitfleet_core::ports::ExecRequest;

/// Disable every LFS filter so a reset never downloads or rewrites objects
const LFS_BYPASS: &[&str] = &[
    "-c",
    "filter.lfs.smudge=",
    "-c",
    "filter.lfs.clean=",
    "-c",
    "filter.lfs.process=",
    "-c",
    "filter.lfs.required=false",
];

fn lfs_bypassed(args: &[&str]) -> ExecRequest {
    ExecRequest::git(LFS_BYPASS.iter().chain(args).copied()).env("GIT_LFS_SKIP_SMUDGE", "1")
}

impl Fleet {
    /// Discard local changes: hard reset to HEAD, then remove untracked files
    pub async fn clean(
        &self,
        repos: &[RepoHandle],
        include_ignored: bool,
        control: &RunControl,
    ) -> RunReport<Outcome<CleanKind>> {
        self.pool(control)
            .run(repos, |repo, _| self.clean_one(repo, include_ignored))
            .await
    }

    async fn clean_one(&self, repo: &RepoHandle, include_ignored: bool) -> Outcome<CleanKind> {
        let name = repo.name();

        // Ignored files never show up in porcelain output, so -x always runs
        if !include_ignored && self.prober.probe(repo).await.is_clean() {
            return skipped(name, CleanKind::Skipped, "already clean");
        }

        let reset = self
            .runner
            .run_with(
                lfs_bypassed(&["reset", "--hard", "HEAD"]).cwd(repo.path()),
                &self.local_rules,
            )
            .await;
        if !reset.is_success() {
            return failure(name, CleanKind::Error, &reset);
        }

        let flags = if include_ignored { "-fdx" } else { "-fd" };
        let clean = self
            .runner
            .run_with(lfs_bypassed(&["clean", flags]).cwd(repo.path()), &self.local_rules)
            .await;
        if !clean.is_success() {
            return failure(name, CleanKind::Error, &clean);
        }

        let removed = clean
            .output()
            .map(|out| out.lines().filter(|line| line.starts_with("Removing ")).count())
            .unwrap_or(0);
        let outcome = Outcome::new(name, CleanKind::Cleaned);
        if removed > 0 {
            outcome.with_detail(format!("{} paths removed", removed))
        } else {
            outcome
        }
    }
}
