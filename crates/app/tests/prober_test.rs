//! Repository state probing against real repositories

mod common;

use anyhow::Result;
use common::*;
use gitfleet::adapters::discovery::FsDiscoveryAdapter;
use gitfleet::services::RunControl;
use gitfleet_core::domain::DETACHED_BRANCH;
use gitfleet_core::ports::{DiscoverReq, DiscoveryPort};
use std::fs;
use tempfile::TempDir;

#[tokio::test]
async fn test_modified_and_untracked_counts() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let repo = create_test_git_repo(&temp_dir.path().join("api"))?;

    fs::write(repo.path().join("a.txt"), "one\nchanged\n")?;
    fs::write(repo.path().join("b.txt"), "two\nchanged\n")?;
    fs::write(repo.path().join("new.txt"), "new\n")?;

    let status = fleet().prober().probe(&repo).await;
    assert_eq!(status.modified, 2);
    assert_eq!(status.staged, 0);
    assert_eq!(status.untracked, 1);
    assert!(!status.is_clean());
    assert!(!status.has_upstream);
    Ok(())
}

#[tokio::test]
async fn test_staged_changes() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let repo = create_test_git_repo(&temp_dir.path().join("api"))?;

    fs::write(repo.path().join("a.txt"), "one\nstaged\n")?;
    stage(repo.path(), "a.txt")?;

    let status = fleet().prober().probe(&repo).await;
    assert_eq!(status.staged, 1);
    assert_eq!(status.modified, 0);
    Ok(())
}

#[tokio::test]
async fn test_detached_head() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let repo = create_test_git_repo(&temp_dir.path().join("api"))?;

    let git_repo = git2::Repository::open(repo.path())?;
    let head = git_repo.head()?.peel_to_commit()?.id();
    git_repo.set_head_detached(head)?;

    let status = fleet().prober().probe(&repo).await;
    assert_eq!(status.branch, DETACHED_BRANCH);
    assert!(status.is_detached());
    Ok(())
}

#[tokio::test]
async fn test_ahead_and_behind_upstream() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let origin = create_test_git_repo(&temp_dir.path().join("origin"))?;
    let clone = clone_from(origin.path(), &temp_dir.path().join("clone"))?;

    commit_file(clone.path(), "local.txt", "local\n", "Local work")?;
    commit_file(origin.path(), "remote.txt", "remote\n", "Remote work")?;

    // Make the remote commit visible without touching the working tree
    git2::Repository::open(clone.path())?
        .find_remote("origin")?
        .fetch(&[] as &[&str], None, None)?;

    let status = fleet().prober().probe(&clone).await;
    assert!(status.has_upstream);
    assert_eq!(status.ahead, 1);
    assert_eq!(status.behind, 1);
    assert!(status.is_clean());
    Ok(())
}

#[tokio::test]
async fn test_status_run_is_idempotent_and_ordered() -> Result<()> {
    let temp_dir = TempDir::new()?;
    for name in ["zeta", "alpha", "mid"] {
        create_test_git_repo(&temp_dir.path().join(name))?;
    }
    fs::write(temp_dir.path().join("mid").join("scratch.txt"), "x")?;

    let repos = FsDiscoveryAdapter::new().scan(&DiscoverReq::new(temp_dir.path()))?;
    let fleet = fleet();
    let control = RunControl::new();

    let first = fleet.status(&repos, &control).await;
    let second = fleet.status(&repos, &control).await;

    assert_eq!(first, second);
    assert!(!first.cancelled);
    let names: Vec<_> = first.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["alpha", "mid", "zeta"]);
    assert_eq!(first.iter().filter(|s| !s.is_clean()).count(), 1);
    Ok(())
}
