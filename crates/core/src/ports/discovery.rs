use crate::domain::repo::RepoHandle;
use anyhow::Result;
use std::path::PathBuf;

/// Request for repository discovery
#[derive(Clone, Debug)]
pub struct DiscoverReq {
    pub base: PathBuf,
    /// Maximum directory depth below `base` to search (None = unlimited)
    pub max_depth: Option<usize>,
}

impl DiscoverReq {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
            max_depth: None,
        }
    }
}

/// Port for repository discovery
pub trait DiscoveryPort: Send + Sync {
    /// Find repositories below the requested base directory.
    /// Results are ordered and contain no duplicate paths.
    /// This is blocking - caller should run in spawn_blocking
    fn scan(&self, req: &DiscoverReq) -> Result<Vec<RepoHandle>>;
}
