use crate::config::Config;
use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use gitfleet_core::app::commands::Command;
use std::path::PathBuf;

#[derive(Parser, Debug, PartialEq)]
#[command(name = "gitfleet")]
#[command(about = "Run git operations across every repository under a directory")]
pub struct CliArgs {
    /// Base directory to scan for repositories (overrides config)
    #[arg(long, global = true)]
    pub base_dir: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Maximum number of repositories processed at once
    #[arg(short = 'j', long, global = true)]
    pub concurrency: Option<usize>,

    /// Per-repository deadline for remote operations, in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Kill git processes that outlive the deadline instead of leaving them running
    #[arg(long, global = true)]
    pub kill_on_timeout: bool,

    /// Only operate on repositories whose name matches this glob
    #[arg(long, global = true)]
    pub filter: Option<String>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub action: Action,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Action {
    /// Show branch, changes and upstream sync for each repository
    Status,

    /// Fetch all remotes
    Fetch {
        /// Keep remote-tracking branches that no longer exist upstream
        #[arg(long)]
        no_prune: bool,
    },

    /// Fast-forward each clean repository from its upstream
    Pull,

    /// Discard all local changes and untracked files
    Clean {
        /// Also remove ignored files
        #[arg(long)]
        ignored: bool,

        /// Confirm that local changes should be thrown away
        #[arg(long)]
        force: bool,
    },

    /// Show uncommitted changes against HEAD
    Diff {
        #[arg(long)]
        stat: bool,
    },

    /// Switch every repository to a branch
    Checkout {
        branch: String,

        /// Create the branch instead of switching to an existing one
        #[arg(short = 'b', long)]
        create: bool,
    },

    /// Run a command in every repository
    Exec {
        #[arg(last = true, required = true)]
        argv: Vec<String>,
    },

    /// Clone repositories into a directory
    Clone {
        dest: PathBuf,

        #[arg(required = true)]
        urls: Vec<String>,

        /// Shallow clone with this many commits
        #[arg(long)]
        depth: Option<u32>,
    },
}

impl Action {
    /// Resolve the subcommand into an engine command, filling gaps from config
    pub fn to_command(&self, config: &Config) -> Result<Command> {
        let command = match self {
            Action::Status => Command::Status,
            Action::Fetch { no_prune } => Command::Fetch {
                prune: config.fetch.prune && !no_prune,
            },
            Action::Pull => Command::Pull,
            Action::Clean { ignored, force } => {
                if !force {
                    bail!("clean discards local changes in every repository; pass --force to confirm");
                }
                Command::Clean {
                    include_ignored: *ignored,
                }
            }
            Action::Diff { stat } => Command::Diff { stat: *stat },
            Action::Checkout { branch, create } => Command::Checkout {
                branch: branch.clone(),
                create: *create,
            },
            Action::Exec { argv } => Command::Exec { argv: argv.clone() },
            Action::Clone { dest, urls, depth } => Command::Clone {
                dest: dest.clone(),
                urls: urls.clone(),
                depth: depth.or(config.clone.depth),
            },
        };

        command.validate()?;
        Ok(command)
    }
}
