use serde::{Deserialize, Serialize};
use std::fmt;

/// A closed, operation-specific vocabulary of per-repository results
pub trait OutcomeKind: Copy + fmt::Debug + PartialEq {
    /// Whether this kind denotes a terminal success
    fn is_success(&self) -> bool;

    /// Stable kebab-case tag, e.g. `up-to-date`
    fn as_str(&self) -> &'static str;
}

/// The result of one operation against one repository.
///
/// `success` always equals `kind.is_success()`, and `error` is only ever set
/// on failures. Both are enforced by the constructors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome<K> {
    pub name: String,
    pub success: bool,
    pub kind: K,
    pub detail: Option<String>,
    pub error: Option<String>,
}

impl<K: OutcomeKind> Outcome<K> {
    pub fn new(name: impl Into<String>, kind: K) -> Self {
        Self {
            name: name.into(),
            success: kind.is_success(),
            kind,
            detail: None,
            error: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Attach an error message. Ignored for success kinds.
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        if !self.success {
            self.error = Some(error.into());
        }
        self
    }

    /// The most useful single line to show for this outcome
    pub fn message(&self) -> Option<&str> {
        self.error.as_deref().or(self.detail.as_deref())
    }
}

impl<K: OutcomeKind> fmt::Display for Outcome<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.kind.as_str())?;
        if let Some(message) = self.message() {
            let first_line = message.lines().next().unwrap_or_default();
            write!(f, " ({})", first_line)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PullKind {
    UpToDate,
    Updated,
    Skipped,
    Error,
}

impl OutcomeKind for PullKind {
    fn is_success(&self) -> bool {
        matches!(self, PullKind::UpToDate | PullKind::Updated)
    }

    fn as_str(&self) -> &'static str {
        match self {
            PullKind::UpToDate => "up-to-date",
            PullKind::Updated => "updated",
            PullKind::Skipped => "skipped",
            PullKind::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FetchKind {
    Fetched,
    UpToDate,
    Error,
}

impl OutcomeKind for FetchKind {
    fn is_success(&self) -> bool {
        !matches!(self, FetchKind::Error)
    }

    fn as_str(&self) -> &'static str {
        match self {
            FetchKind::Fetched => "fetched",
            FetchKind::UpToDate => "up-to-date",
            FetchKind::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CloneKind {
    Cloned,
    Exists,
    Skipped,
    Error,
}

impl OutcomeKind for CloneKind {
    fn is_success(&self) -> bool {
        matches!(self, CloneKind::Cloned)
    }

    fn as_str(&self) -> &'static str {
        match self {
            CloneKind::Cloned => "cloned",
            CloneKind::Exists => "exists",
            CloneKind::Skipped => "skipped",
            CloneKind::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CleanKind {
    Cleaned,
    Skipped,
    Error,
}

impl OutcomeKind for CleanKind {
    fn is_success(&self) -> bool {
        matches!(self, CleanKind::Cleaned)
    }

    fn as_str(&self) -> &'static str {
        match self {
            CleanKind::Cleaned => "cleaned",
            CleanKind::Skipped => "skipped",
            CleanKind::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CheckoutKind {
    Switched,
    Created,
    NotFound,
    Exists,
    Skipped,
    Error,
}

impl OutcomeKind for CheckoutKind {
    fn is_success(&self) -> bool {
        matches!(self, CheckoutKind::Switched | CheckoutKind::Created)
    }

    fn as_str(&self) -> &'static str {
        match self {
            CheckoutKind::Switched => "switched",
            CheckoutKind::Created => "created",
            CheckoutKind::NotFound => "not-found",
            CheckoutKind::Exists => "exists",
            CheckoutKind::Skipped => "skipped",
            CheckoutKind::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiffKind {
    Changes,
    Clean,
    Error,
}

impl OutcomeKind for DiffKind {
    fn is_success(&self) -> bool {
        !matches!(self, DiffKind::Error)
    }

    fn as_str(&self) -> &'static str {
        match self {
            DiffKind::Changes => "changes",
            DiffKind::Clean => "clean",
            DiffKind::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExecKind {
    Ok,
    Error,
}

impl OutcomeKind for ExecKind {
    fn is_success(&self) -> bool {
        matches!(self, ExecKind::Ok)
    }

    fn as_str(&self) -> &'static str {
        match self {
            ExecKind::Ok => "ok",
            ExecKind::Error => "error",
        }
    }
}
