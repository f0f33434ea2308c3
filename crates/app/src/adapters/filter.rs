use glob::{MatchOptions, Pattern};
use gitfleet_core::domain::RepoHandle;
use gitfleet_core::CoreError;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// Narrows a repository list by a glob-like pattern on the repository name.
/// `*` and `?` are supported and matching ignores case.
#[derive(Debug, Clone)]
pub struct PatternFilter {
    pattern: Pattern,
}

impl PatternFilter {
    pub fn new(pattern: &str) -> gitfleet_core::Result<Self> {
        let pattern = Pattern::new(pattern).map_err(|err| CoreError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: err.msg.to_string(),
        })?;
        Ok(Self { pattern })
    }

    pub fn matches(&self, handle: &RepoHandle) -> bool {
        self.pattern.matches_with(&handle.name(), MATCH_OPTIONS)
    }

    /// Keep matching handles, preserving their order
    pub fn apply(&self, handles: Vec<RepoHandle>) -> Vec<RepoHandle> {
        handles.into_iter().filter(|h| self.matches(h)).collect()
    }
}
