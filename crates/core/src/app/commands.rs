use crate::error::{CoreError, Result};
use std::path::PathBuf;

/// The logical action applied to every selected repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Probe branch, change counts and upstream sync
    Status,

    /// Fetch all remotes
    Fetch { prune: bool },

    /// Fast-forward pull from the configured upstream
    Pull,

    /// Discard working tree changes and untracked files
    Clean { include_ignored: bool },

    /// Show uncommitted changes
    Diff { stat: bool },

    /// Switch to (or create) a branch
    Checkout { branch: String, create: bool },

    /// Run an arbitrary command inside each repository
    Exec { argv: Vec<String> },

    /// Clone remote repositories into a destination directory
    Clone {
        dest: PathBuf,
        urls: Vec<String>,
        depth: Option<u32>,
    },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Status => "status",
            Command::Fetch { .. } => "fetch",
            Command::Pull => "pull",
            Command::Clean { .. } => "clean",
            Command::Diff { .. } => "diff",
            Command::Checkout { .. } => "checkout",
            Command::Exec { .. } => "exec",
            Command::Clone { .. } => "clone",
        }
    }

    /// Reject commands whose arguments can never succeed
    pub fn validate(&self) -> Result<()> {
        match self {
            Command::Checkout { branch, .. } if branch.trim().is_empty() => {
                Err(CoreError::InvalidCommand {
                    reason: "checkout needs a branch name".to_string(),
                })
            }
            Command::Exec { argv } if argv.is_empty() => Err(CoreError::InvalidCommand {
                reason: "exec needs a command to run".to_string(),
            }),
            Command::Clone { urls, .. } if urls.is_empty() => Err(CoreError::InvalidCommand {
                reason: "clone needs at least one URL".to_string(),
            }),
            Command::Clone { depth: Some(0), .. } => Err(CoreError::InvalidCommand {
                reason: "clone depth must be at least 1".to_string(),
            }),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_empty_arguments() {
        let checkout = Command::Checkout {
            branch: "  ".to_string(),
            create: false,
        };
        assert!(checkout.validate().is_err());
        assert!(Command::Exec { argv: vec![] }.validate().is_err());

        let clone = Command::Clone {
            dest: PathBuf::from("/tmp"),
            urls: vec!["https://example.com/a.git".to_string()],
            depth: Some(0),
        };
        assert!(clone.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_well_formed_commands() {
        assert!(Command::Status.validate().is_ok());
        assert!(Command::Checkout {
            branch: "main".to_string(),
            create: true,
        }
        .validate()
        .is_ok());
        assert!(Command::Exec {
            argv: vec!["ls".to_string()],
        }
        .validate()
        .is_ok());
    }

    #[test]
    fn test_command_names() {
        assert_eq!(Command::Diff { stat: false }.name(), "diff");
        assert_eq!(Command::Fetch { prune: true }.name(), "fetch");
    }
}
