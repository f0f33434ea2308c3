use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Branch name reported when HEAD points at a commit rather than a branch
pub const DETACHED_BRANCH: &str = "detached";

/// One repository the engine can operate on, identified by its path
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RepoHandle {
    path: PathBuf,
}

impl RepoHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Display name - the last segment of the path
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.to_string_lossy().to_string())
    }
}

impl std::fmt::Display for RepoHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name(), self.path.display())
    }
}

/// Working tree change counts parsed from `git status --porcelain`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeCounts {
    pub modified: usize,
    pub staged: usize,
    pub untracked: usize,
    pub deleted: usize,
}

impl ChangeCounts {
    /// Parse porcelain v1 output.
    ///
    /// Column 1 is the index state, column 2 the worktree state. Lines must
    /// not be trimmed: a leading space is the "unchanged in index" marker.
    pub fn parse(porcelain: &str) -> Self {
        let mut counts = Self::default();

        for line in porcelain.lines() {
            let bytes = line.as_bytes();
            if bytes.len() < 2 {
                continue;
            }

            let (index, worktree) = (bytes[0], bytes[1]);
            if index == b'?' {
                counts.untracked += 1;
                continue;
            }
            if index != b' ' {
                counts.staged += 1;
            }
            match worktree {
                b'M' => counts.modified += 1,
                b'D' => counts.deleted += 1,
                _ => {}
            }
        }

        counts
    }

    pub fn is_empty(&self) -> bool {
        self.modified == 0 && self.staged == 0 && self.untracked == 0 && self.deleted == 0
    }
}

/// Git repository status information, recomputed on every probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoStatus {
    pub name: String,
    pub path: PathBuf,
    pub branch: String,
    pub modified: usize,
    pub staged: usize,
    pub untracked: usize,
    pub deleted: usize,
    pub ahead: usize,
    pub behind: usize,
    pub has_upstream: bool,
}

impl RepoStatus {
    /// A status with every field at its zero value
    pub fn empty(handle: &RepoHandle) -> Self {
        Self {
            name: handle.name(),
            path: handle.path().to_path_buf(),
            branch: String::new(),
            modified: 0,
            staged: 0,
            untracked: 0,
            deleted: 0,
            ahead: 0,
            behind: 0,
            has_upstream: false,
        }
    }

    pub fn apply_changes(&mut self, counts: ChangeCounts) {
        self.modified = counts.modified;
        self.staged = counts.staged;
        self.untracked = counts.untracked;
        self.deleted = counts.deleted;
    }

    pub fn changes(&self) -> ChangeCounts {
        ChangeCounts {
            modified: self.modified,
            staged: self.staged,
            untracked: self.untracked,
            deleted: self.deleted,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.changes().is_empty()
    }

    pub fn is_detached(&self) -> bool {
        self.branch == DETACHED_BRANCH
    }
}
