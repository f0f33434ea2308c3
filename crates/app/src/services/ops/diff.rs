use crate::services::fleet::failure;
use crate::services::{Fleet, RunControl};
use gitfleet_core::classify::{classify, Attempt};
use gitfleet_core::domain::{DiffKind, Outcome, RepoHandle};
use gitfleet_core::pool::RunReport;
use gitfleet_core::ports::ExecRequest;

impl Fleet {
    /// Working tree changes against HEAD
    pub async fn diff(
        &self,
        repos: &[RepoHandle],
        stat: bool,
        control: &RunControl,
    ) -> RunReport<Outcome<DiffKind>> {
        self.pool(control)
            .run(repos, |repo, _| self.diff_one(repo, stat))
            .await
    }

    async fn diff_one(&self, repo: &RepoHandle, stat: bool) -> Outcome<DiffKind> {
        let mut args = vec!["--no-pager", "diff", "--no-ext-diff"];
        if stat {
            args.push("--stat");
        }
        args.push("HEAD");

        let req = ExecRequest::git(args)
            .cwd(repo.path())
            .env("GIT_OPTIONAL_LOCKS", "0");
        let attempt = self.runner.attempt(req).await;

        // Only stdout is the diff; stderr carries warnings such as line-ending notices
        match &attempt {
            Attempt::Completed(output) if output.success() => {
                let text = output.stdout.trim_end();
                if text.is_empty() {
                    Outcome::new(repo.name(), DiffKind::Clean)
                } else {
                    Outcome::new(repo.name(), DiffKind::Changes).with_detail(text)
                }
            }
            _ => failure(
                repo.name(),
                DiffKind::Error,
                &classify(&attempt, &self.local_rules),
            ),
        }
    }
}
