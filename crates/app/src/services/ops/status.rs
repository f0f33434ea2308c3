use crate::services::{Fleet, RunControl};
use gitfleet_core::domain::{RepoHandle, RepoStatus};
use gitfleet_core::pool::RunReport;

impl Fleet {
    /// Probe every repository
    pub async fn status(
        &self,
        repos: &[RepoHandle],
        control: &RunControl,
    ) -> RunReport<RepoStatus> {
        self.pool(control)
            .run(repos, |repo, _| self.prober.probe(repo))
            .await
    }
}
