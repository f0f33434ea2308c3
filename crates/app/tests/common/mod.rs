//! Repository fixtures shared by the integration tests. Repositories are
//! built with git2 so the tests only depend on the `git` binary for the
//! operations under test.

#![allow(dead_code)]

use anyhow::Result;
use git2::{Repository, Signature};
use gitfleet::adapters::process::TokioProcess;
use gitfleet::services::{Fleet, FleetSettings};
use gitfleet_core::domain::RepoHandle;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// A repository with one commit containing `a.txt` and `b.txt`
pub fn create_test_git_repo(path: &Path) -> Result<RepoHandle> {
    fs::create_dir_all(path)?;
    Repository::init(path)?;
    fs::write(path.join("a.txt"), "one\n")?;
    fs::write(path.join("b.txt"), "two\n")?;
    commit_paths(path, &["a.txt", "b.txt"], "Initial commit")?;
    Ok(RepoHandle::new(path))
}

/// Stage `paths` and commit them on top of HEAD
pub fn commit_paths(path: &Path, paths: &[&str], message: &str) -> Result<git2::Oid> {
    let repo = Repository::open(path)?;
    let signature = Signature::now("Test User", "test@example.com")?;

    let tree_id = {
        let mut index = repo.index()?;
        for p in paths {
            index.add_path(Path::new(p))?;
        }
        index.write()?;
        index.write_tree()?
    };
    let tree = repo.find_tree(tree_id)?;

    let parent = match repo.head() {
        Ok(head) => Some(head.peel_to_commit()?),
        Err(_) => None,
    };
    let parents: Vec<&git2::Commit> = parent.iter().collect();

    Ok(repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)?)
}

/// Write a file and commit it
pub fn commit_file(path: &Path, name: &str, contents: &str, message: &str) -> Result<git2::Oid> {
    fs::write(path.join(name), contents)?;
    commit_paths(path, &[name], message)
}

/// Stage a path without committing
pub fn stage(path: &Path, name: &str) -> Result<()> {
    let repo = Repository::open(path)?;
    let mut index = repo.index()?;
    index.add_path(Path::new(name))?;
    index.write()?;
    Ok(())
}

/// Clone `origin` into `dest`; the clone tracks origin's current branch
pub fn clone_from(origin: &Path, dest: &Path) -> Result<RepoHandle> {
    let url = origin.to_str().ok_or_else(|| anyhow::anyhow!("non-utf8 path"))?;
    Repository::clone(url, dest)?;
    Ok(RepoHandle::new(dest))
}

pub fn create_branch(path: &Path, name: &str) -> Result<()> {
    let repo = Repository::open(path)?;
    let head = repo.head()?.peel_to_commit()?;
    repo.branch(name, &head, false)?;
    Ok(())
}

pub fn current_branch(path: &Path) -> Result<String> {
    let repo = Repository::open(path)?;
    let head = repo.head()?;
    Ok(head.shorthand().unwrap_or_default().to_string())
}

pub fn fleet() -> Fleet {
    fleet_with_timeout(Duration::from_secs(30))
}

pub fn fleet_with_timeout(timeout: Duration) -> Fleet {
    let settings = FleetSettings {
        concurrency: 4,
        timeout,
        kill_on_timeout: false,
    };
    Fleet::new(Arc::new(TokioProcess::new()), &settings)
}

pub fn paths(handles: &[RepoHandle]) -> Vec<PathBuf> {
    handles.iter().map(|h| h.path().to_path_buf()).collect()
}
