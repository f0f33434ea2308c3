//! Outcome classification
//!
//! Turns a finished (or abandoned) subprocess into a small vocabulary of
//! verdicts. Text matching is driven by an ordered rule table so that new
//! wording from git only means adding needles, not code paths.

use crate::ports::ProcessOutput;
use regex::Regex;
use std::sync::OnceLock;
use std::time::Duration;

/// A textual signal recognised in git's output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Transport failure talking to a remote
    Connection,
    /// A branch, ref or path that git could not resolve
    NotFound,
    /// A branch or directory that is already present
    AlreadyExists,
    /// Nothing to update
    UpToDate,
}

/// Which exit status a rule is evaluated against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applies {
    Failure,
    Success,
    Any,
}

impl Applies {
    fn matches(self, failed: bool) -> bool {
        match self {
            Applies::Failure => failed,
            Applies::Success => !failed,
            Applies::Any => true,
        }
    }
}

/// One `(needles, signal)` row. Needles are matched case-insensitively as
/// substrings; any single needle is enough.
#[derive(Debug, Clone)]
pub struct Rule {
    pub signal: Signal,
    pub applies: Applies,
    needles: Vec<String>,
}

impl Rule {
    pub fn new(signal: Signal, applies: Applies, needles: &[&str]) -> Self {
        Self {
            signal,
            applies,
            needles: needles.iter().map(|n| n.to_lowercase()).collect(),
        }
    }

    fn is_match(&self, haystack_lower: &str) -> bool {
        self.needles.iter().any(|n| haystack_lower.contains(n.as_str()))
    }
}

pub const CONNECTION_NEEDLES: &[&str] = &[
    "could not resolve host",
    "connection refused",
    "network is unreachable",
    "no route to host",
    "connection timed out",
    "permission denied (publickey)",
    "authentication failed",
    "could not read from remote repository",
    "unable to access 'http",
    "unable to access 'git",
    "unable to access 'ssh",
];

pub const NOT_FOUND_NEEDLES: &[&str] = &[
    "did not match any file(s) known to git",
    "invalid reference",
    "not a valid object name",
    "couldn't find remote ref",
    "not found in upstream",
];

pub const ALREADY_EXISTS_NEEDLES: &[&str] = &["already exists"];

pub const UP_TO_DATE_NEEDLES: &[&str] = &["already up to date", "already up-to-date"];

/// Ordered rule table; the first matching rule wins
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Rules for commands that never talk to a remote: transport needles
    /// would only hide a local diagnostic
    pub fn local() -> Self {
        Self::default().without(Signal::Connection)
    }

    /// Append a rule with the lowest priority
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn without(mut self, signal: Signal) -> Self {
        self.rules.retain(|rule| rule.signal != signal);
        self
    }

    pub fn first_match(&self, text: &str, failed: bool) -> Option<Signal> {
        let lower = text.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.applies.matches(failed) && rule.is_match(&lower))
            .map(|rule| rule.signal)
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::new(vec![
            Rule::new(Signal::Connection, Applies::Failure, CONNECTION_NEEDLES),
            Rule::new(Signal::NotFound, Applies::Failure, NOT_FOUND_NEEDLES),
            Rule::new(Signal::AlreadyExists, Applies::Failure, ALREADY_EXISTS_NEEDLES),
            Rule::new(Signal::UpToDate, Applies::Success, UP_TO_DATE_NEEDLES),
        ])
    }
}

/// How an attempt to run a subprocess ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt {
    /// The process exited (with any status)
    Completed(ProcessOutput),
    /// The deadline passed before the process finished
    TimedOut { elapsed: Duration },
    /// The process could not be started or waited on
    Failed(String),
}

/// The classified result of an attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    TimedOut { elapsed: Duration },
    /// Raw transport diagnostics are deliberately dropped
    Connection,
    Signal { signal: Signal, output: String },
    Failed { output: String },
    Succeeded { output: String },
}

impl Verdict {
    pub fn is_success(&self) -> bool {
        match self {
            Verdict::Succeeded { .. } => true,
            Verdict::Signal { signal, .. } => *signal == Signal::UpToDate,
            _ => false,
        }
    }

    /// Captured output, when the process ran to completion
    pub fn output(&self) -> Option<&str> {
        match self {
            Verdict::Signal { output, .. }
            | Verdict::Failed { output }
            | Verdict::Succeeded { output } => Some(output.as_str()),
            Verdict::TimedOut { .. } | Verdict::Connection => None,
        }
    }

    /// User-facing text for a failed verdict
    pub fn failure_message(&self) -> Option<String> {
        match self {
            Verdict::TimedOut { elapsed } => {
                Some(format!("timed out after {}", format_elapsed(*elapsed)))
            }
            Verdict::Connection => Some("connection failed".to_string()),
            Verdict::Failed { output } => Some(output.clone()),
            Verdict::Signal { output, .. } if !self.is_success() => Some(output.clone()),
            _ => None,
        }
    }
}

/// Classify an attempt. Priority: timeout, then the rule table (connection
/// first), then generic failure, then success.
pub fn classify(attempt: &Attempt, rules: &RuleSet) -> Verdict {
    let (failed, text, output) = match attempt {
        Attempt::TimedOut { elapsed } => return Verdict::TimedOut { elapsed: *elapsed },
        Attempt::Failed(error) => (true, error.clone(), error.clone()),
        Attempt::Completed(out) => {
            let failed = !out.success();
            let text = format!("{}\n{}", out.stderr, out.stdout);
            (failed, text, out.combined())
        }
    };

    match rules.first_match(&text, failed) {
        Some(Signal::Connection) => Verdict::Connection,
        Some(signal) => Verdict::Signal { signal, output },
        None if failed => Verdict::Failed { output },
        None => Verdict::Succeeded { output },
    }
}

/// Extract the count from git's `N file(s) changed` summary
pub fn files_changed(output: &str) -> Option<usize> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| {
        Regex::new(r"(\d+) files? changed").expect("files-changed pattern is valid")
    });

    pattern
        .captures(output)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

pub fn format_elapsed(elapsed: Duration) -> String {
    if elapsed.subsec_millis() == 0 {
        format!("{}s", elapsed.as_secs())
    } else {
        format!("{:.1}s", elapsed.as_secs_f64())
    }
}
