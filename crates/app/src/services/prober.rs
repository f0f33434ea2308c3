use gitfleet_core::domain::{ChangeCounts, RepoHandle, RepoStatus, DETACHED_BRANCH};
use gitfleet_core::ports::{ExecRequest, ProcessPort};
use std::sync::Arc;
use tracing::debug;

/// Derives a `RepoStatus` from git's machine-readable output.
///
/// Every step is best-effort: a failing git call leaves its fields at their
/// zero value instead of failing the probe.
#[derive(Clone)]
pub struct Prober {
    process: Arc<dyn ProcessPort>,
}

impl Prober {
    pub fn new(process: Arc<dyn ProcessPort>) -> Self {
        Self { process }
    }

    pub async fn probe(&self, handle: &RepoHandle) -> RepoStatus {
        let mut status = RepoStatus::empty(handle);

        status.branch = self.current_branch(handle).await.unwrap_or_default();

        if let Some(porcelain) = self.changes(handle).await {
            status.apply_changes(ChangeCounts::parse(&porcelain));
        }

        if self.upstream(handle).await.is_some() {
            status.has_upstream = true;
            status.behind = self.count(handle, "HEAD..@{u}").await.unwrap_or(0);
            status.ahead = self.count(handle, "@{u}..HEAD").await.unwrap_or(0);
        }

        status
    }

    /// Current branch name, `detached` for a detached HEAD
    pub async fn current_branch(&self, handle: &RepoHandle) -> Option<String> {
        if let Some(name) = self.git(handle, &["rev-parse", "--abbrev-ref", "HEAD"]).await {
            let name = name.trim();
            return Some(if name == "HEAD" { DETACHED_BRANCH } else { name }.to_string());
        }

        // No commits yet: rev-parse fails but HEAD still names a branch
        self.git(handle, &["symbolic-ref", "--short", "HEAD"])
            .await
            .map(|name| name.trim().to_string())
    }

    /// The upstream ref of the current branch, if one is configured
    pub async fn upstream(&self, handle: &RepoHandle) -> Option<String> {
        self.git(
            handle,
            &["rev-parse", "--abbrev-ref", "--symbolic-full-name", "@{u}"],
        )
        .await
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
    }

    async fn changes(&self, handle: &RepoHandle) -> Option<String> {
        // Raw stdout: leading spaces in porcelain lines are significant
        self.git(handle, &["status", "--porcelain"]).await
    }

    async fn count(&self, handle: &RepoHandle, range: &str) -> Option<usize> {
        self.git(handle, &["rev-list", "--count", range])
            .await
            .and_then(|out| out.trim().parse().ok())
    }

    async fn git(&self, handle: &RepoHandle, args: &[&str]) -> Option<String> {
        let req = ExecRequest::git(args.iter().copied())
            .cwd(handle.path())
            // Read-only probes must not take index.lock away from mutating commands
            .env("GIT_OPTIONAL_LOCKS", "0");

        match self.process.exec(req).await {
            Ok(output) if output.success() => Some(output.stdout),
            Ok(output) => {
                debug!(
                    "git {} failed in {}: {}",
                    args.join(" "),
                    handle.name(),
                    output.stderr.trim()
                );
                None
            }
            Err(err) => {
                debug!("git {} could not run in {}: {}", args.join(" "), handle.name(), err);
                None
            }
        }
    }
}
