use crate::services::{Prober, RemoteRunner, RunControl};
use gitfleet_core::classify::{RuleSet, Verdict};
use gitfleet_core::domain::{Outcome, OutcomeKind};
use gitfleet_core::pool::WorkerPool;
use gitfleet_core::ports::{ExecRequest, ProcessPort};
use std::sync::Arc;
use std::time::Duration;

/// Engine settings resolved from configuration and CLI flags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FleetSettings {
    pub concurrency: usize,
    pub timeout: Duration,
    pub kill_on_timeout: bool,
}

impl Default for FleetSettings {
    fn default() -> Self {
        Self {
            concurrency: 8,
            timeout: Duration::from_secs(60),
            kill_on_timeout: false,
        }
    }
}

/// Applies one git action across many repositories.
///
/// Each command lives in its own module under `services::ops` and builds a
/// per-repository operation that the worker pool fans out.
pub struct Fleet {
    pub(crate) prober: Prober,
    pub(crate) runner: RemoteRunner,
    /// Classification for commands that only touch the local repository
    pub(crate) local_rules: RuleSet,
    concurrency: usize,
}

impl Fleet {
    pub fn new(process: Arc<dyn ProcessPort>, settings: &FleetSettings) -> Self {
        Self {
            prober: Prober::new(process.clone()),
            runner: RemoteRunner::new(process, settings.timeout)
                .with_kill_on_timeout(settings.kill_on_timeout),
            local_rules: RuleSet::local(),
            concurrency: settings.concurrency,
        }
    }

    pub fn prober(&self) -> &Prober {
        &self.prober
    }

    pub(crate) fn pool<'a>(&self, control: &'a RunControl) -> WorkerPool<'a> {
        WorkerPool::new(self.concurrency)
            .cancel_when(move || control.is_cancelled())
            .on_progress(move |progress| control.report(progress))
    }
}

/// A git invocation that talks to a remote: never wait on a credential prompt
pub(crate) fn remote_git<I, S>(args: I) -> ExecRequest
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    ExecRequest::git(args).env("GIT_TERMINAL_PROMPT", "0")
}

pub(crate) fn skipped<K: OutcomeKind>(
    name: String,
    kind: K,
    reason: impl Into<String>,
) -> Outcome<K> {
    Outcome::new(name, kind).with_detail(reason)
}

/// Map a failed verdict onto an outcome of the given (failure) kind
pub(crate) fn failure<K: OutcomeKind>(name: String, kind: K, verdict: &Verdict) -> Outcome<K> {
    let message = verdict
        .failure_message()
        .unwrap_or_else(|| "unexpected result".to_string());
    let outcome = Outcome::new(name, kind);

    match verdict {
        Verdict::TimedOut { .. } => outcome.with_error("timeout").with_detail(message),
        _ => outcome.with_error(message),
    }
}
