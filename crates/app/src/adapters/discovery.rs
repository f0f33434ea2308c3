use anyhow::{Context, Result};
use gitfleet_core::domain::RepoHandle;
use gitfleet_core::ports::{DiscoverReq, DiscoveryPort};
use std::path::Path;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// Directories created by package managers and build tools; never searched
pub const DEPENDENCY_DIRS: &[&str] = &[
    "node_modules",
    "bower_components",
    "vendor",
    "target",
    "venv",
    "__pycache__",
];

/// File system discovery adapter that implements DiscoveryPort
#[derive(Debug, Default, Clone)]
pub struct FsDiscoveryAdapter;

impl FsDiscoveryAdapter {
    pub fn new() -> Self {
        Self
    }

    /// Find all git repositories in the given base path
    fn find_repos(&self, base_path: &Path, max_depth: Option<usize>) -> Result<Vec<RepoHandle>> {
        let mut walker = WalkDir::new(base_path).follow_links(false).sort_by_file_name();
        if let Some(depth) = max_depth {
            walker = walker.max_depth(depth);
        }

        let mut repositories = Vec::new();
        let mut entries = walker
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_excluded(e));

        while let Some(entry) = entries.next() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) if err.depth() == 0 => {
                    return Err(err).with_context(|| {
                        format!("Failed to read base directory {}", base_path.display())
                    });
                }
                Err(err) => {
                    warn!("Skipping unreadable directory entry: {}", err);
                    continue;
                }
            };

            if !entry.file_type().is_dir() {
                continue;
            }

            // A .git file (worktree, submodule) counts as well as a directory
            if entry.path().join(".git").exists() {
                debug!("Found repository at {}", entry.path().display());
                repositories.push(RepoHandle::new(entry.path()));
                // Don't descend into a repository
                entries.skip_current_dir();
            }
        }

        repositories.sort();
        repositories.dedup();
        Ok(repositories)
    }
}

/// Hidden directories (including .git itself) and dependency directories
fn is_excluded(entry: &DirEntry) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || DEPENDENCY_DIRS.contains(&name.as_ref())
}

impl DiscoveryPort for FsDiscoveryAdapter {
    fn scan(&self, req: &DiscoverReq) -> Result<Vec<RepoHandle>> {
        let repositories = self.find_repos(&req.base, req.max_depth)?;
        debug!(
            "Discovery found {} repositories under {}",
            repositories.len(),
            req.base.display()
        );
        Ok(repositories)
    }
}
