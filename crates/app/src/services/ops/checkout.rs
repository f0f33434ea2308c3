use crate::services::fleet::{failure, skipped};
use crate::services::{Fleet, RunControl};
use gitfleet_core::classify::{Signal, Verdict};
use gitfleet_core::domain::{CheckoutKind, Outcome, RepoHandle};
use gitfleet_core::pool::RunReport;
use gitfleet_core::ports::ExecRequest;

impl Fleet {
    /// Switch every repository to `branch`, or create it when `create` is set.
    ///
    /// A dirty tree only blocks switching: `checkout -b` starts from the
    /// current commit and carries local changes along unchanged.
    pub async fn checkout(
        &self,
        repos: &[RepoHandle],
        branch: &str,
        create: bool,
        control: &RunControl,
    ) -> RunReport<Outcome<CheckoutKind>> {
        self.pool(control)
            .run(repos, |repo, _| self.checkout_one(repo, branch, create))
            .await
    }

    async fn checkout_one(
        &self,
        repo: &RepoHandle,
        branch: &str,
        create: bool,
    ) -> Outcome<CheckoutKind> {
        let name = repo.name();
        let status = self.prober.probe(repo).await;

        if status.branch == branch {
            return skipped(name, CheckoutKind::Skipped, format!("already on {}", branch));
        }
        if !create && !status.is_clean() {
            return skipped(name, CheckoutKind::Skipped, "uncommitted changes");
        }

        let args = if create {
            vec!["checkout", "-b", branch]
        } else {
            vec!["checkout", branch]
        };
        let verdict = self
            .runner
            .run_with(ExecRequest::git(args).cwd(repo.path()), &self.local_rules)
            .await;

        match verdict {
            Verdict::Signal {
                signal: Signal::NotFound,
                ..
            } => Outcome::new(name, CheckoutKind::NotFound)
                .with_error(format!("branch {} not found", branch)),
            Verdict::Signal {
                signal: Signal::AlreadyExists,
                ..
            } => Outcome::new(name, CheckoutKind::Exists)
                .with_error(format!("branch {} already exists", branch)),
            v if v.is_success() => Outcome::new(
                name,
                if create {
                    CheckoutKind::Created
                } else {
                    CheckoutKind::Switched
                },
            )
            .with_detail(branch),
            other => failure(name, CheckoutKind::Error, &other),
        }
    }
}
