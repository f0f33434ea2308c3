use crate::services::fleet::{failure, remote_git, skipped};
use crate::services::{Fleet, RunControl};
use gitfleet_core::classify::{Signal, Verdict};
use gitfleet_core::domain::{CloneKind, Outcome};
use gitfleet_core::pool::RunReport;
use std::path::Path;
use tracing::debug;

/// Directory name git would pick for `url`: the last path segment without
/// a `.git` suffix. Handles `scp`-style `host:name.git` remotes.
pub fn clone_target(url: &str) -> Option<String> {
    let trimmed = url.trim().trim_end_matches('/');
    let segment = trimmed.rsplit(['/', ':']).next()?;
    let name = segment.strip_suffix(".git").unwrap_or(segment);

    if name.is_empty() || name == "." || name == ".." {
        None
    } else {
        Some(name.to_string())
    }
}

impl Fleet {
    /// Clone every URL into `dest`, skipping targets that already exist
    pub async fn clone_repos(
        &self,
        urls: &[String],
        dest: &Path,
        depth: Option<u32>,
        control: &RunControl,
    ) -> RunReport<Outcome<CloneKind>> {
        self.pool(control)
            .run(urls, |url, _| self.clone_one(url, dest, depth))
            .await
    }

    async fn clone_one(&self, url: &str, dest: &Path, depth: Option<u32>) -> Outcome<CloneKind> {
        let Some(target) = clone_target(url) else {
            return Outcome::new(url, CloneKind::Error)
                .with_error("cannot derive a directory name from the URL");
        };

        if tokio::fs::try_exists(dest.join(&target)).await.unwrap_or(false) {
            return skipped(target, CloneKind::Skipped, "target directory exists");
        }

        let mut args = vec!["clone".to_string()];
        if let Some(depth) = depth {
            args.push("--depth".to_string());
            args.push(depth.to_string());
        }
        args.push(url.to_string());
        args.push(target.clone());

        let verdict = self.runner.run(remote_git(args).cwd(dest)).await;
        debug!("clone {} into {}: {:?}", url, dest.display(), verdict);

        match verdict {
            Verdict::Signal {
                signal: Signal::AlreadyExists,
                output,
            } => Outcome::new(target, CloneKind::Exists).with_error(output),
            v if v.is_success() => Outcome::new(target, CloneKind::Cloned),
            other => failure(target, CloneKind::Error, &other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::fleet_with;
    use super::*;
    use crate::adapters::testing::ScriptedProcess;

    #[test]
    fn test_clone_target_from_common_url_shapes() {
        assert_eq!(clone_target("https://github.com/acme/api.git").as_deref(), Some("api"));
        assert_eq!(clone_target("https://github.com/acme/api").as_deref(), Some("api"));
        assert_eq!(clone_target("git@github.com:acme/web.git").as_deref(), Some("web"));
        assert_eq!(clone_target("git@host:tools.git").as_deref(), Some("tools"));
        assert_eq!(clone_target("/srv/git/lib.git/").as_deref(), Some("lib"));
        assert_eq!(clone_target(""), None);
        assert_eq!(clone_target(".git"), None);
    }

    #[tokio::test]
    async fn test_clone_with_depth() {
        let dest = tempfile::tempdir().unwrap();
        let process = ScriptedProcess::new().respond(
            "clone --depth 1 https://git.example/acme/api.git api",
            0,
            "",
            "Cloning into 'api'...\n",
        );
        let (fleet, process) = fleet_with(process);

        let urls = vec!["https://git.example/acme/api.git".to_string()];
        let report = fleet.clone_repos(&urls, dest.path(), Some(1), &RunControl::new()).await;
        let outcome = report.results[0].as_ref().unwrap();
        assert_eq!(outcome.name, "api");
        assert_eq!(outcome.kind, CloneKind::Cloned);
        assert_eq!(process.calls()[0].cwd.as_deref(), Some(dest.path()));
    }

    #[tokio::test]
    async fn test_existing_target_is_skipped() {
        let dest = tempfile::tempdir().unwrap();
        std::fs::create_dir(dest.path().join("api")).unwrap();
        let (fleet, process) = fleet_with(ScriptedProcess::new());

        let urls = vec!["git@git.example:acme/api.git".to_string()];
        let report = fleet.clone_repos(&urls, dest.path(), None, &RunControl::new()).await;
        assert_eq!(report.results[0].as_ref().unwrap().kind, CloneKind::Skipped);
        assert!(process.calls().is_empty());
    }

    #[tokio::test]
    async fn test_unresolvable_host_is_connection_failure() {
        let dest = tempfile::tempdir().unwrap();
        let process = ScriptedProcess::new().respond(
            "clone https://nowhere.invalid/x.git x",
            128,
            "",
            "Cloning into 'x'...\nfatal: unable to access 'https://nowhere.invalid/x.git/': Could not resolve host: nowhere.invalid\n",
        );
        let (fleet, _) = fleet_with(process);

        let urls = vec!["https://nowhere.invalid/x.git".to_string()];
        let report = fleet.clone_repos(&urls, dest.path(), None, &RunControl::new()).await;
        let outcome = report.results[0].as_ref().unwrap();
        assert_eq!(outcome.kind, CloneKind::Error);
        assert_eq!(outcome.error.as_deref(), Some("connection failed"));
    }
}
