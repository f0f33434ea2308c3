//! Plain-text output for the command line: a progress line on stderr while
//! a run is in flight, then one line per repository and a summary on stdout.

use crossbeam_channel::Receiver;
use gitfleet_core::app::Summary;
use gitfleet_core::domain::{Outcome, OutcomeKind, Progress, RepoStatus};
use gitfleet_core::pool::RunReport;
use std::io::{self, Write};
use std::thread::{self, JoinHandle};
use tracing::debug;

/// Draw progress ticks until every sender is dropped.
///
/// The line is redrawn in place with `\r`; a trailing newline is written
/// once the channel closes so later output starts on a fresh line.
pub fn spawn_progress_renderer(receiver: Receiver<Progress>) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("progress".to_string())
        .spawn(move || {
            let stderr = io::stderr();
            draw_progress(receiver, &mut stderr.lock());
        })
}

fn draw_progress(receiver: Receiver<Progress>, out: &mut impl Write) {
    let mut drew = false;
    for progress in receiver {
        if write!(out, "\r{}", progress).and_then(|_| out.flush()).is_err() {
            debug!("progress output closed");
            return;
        }
        drew = true;
    }
    if drew {
        let _ = writeln!(out);
    }
}

/// `●` dirty, `⋯` ahead or behind, `✓` clean and in sync
pub fn status_indicator(status: &RepoStatus) -> &'static str {
    if !status.is_clean() {
        "●"
    } else if status.ahead > 0 || status.behind > 0 {
        "⋯"
    } else {
        "✓"
    }
}

pub fn format_status_line(status: &RepoStatus) -> String {
    let branch = if status.branch.is_empty() { "?" } else { status.branch.as_str() };
    let mut parts = vec![format!("{} {} ({})", status_indicator(status), status.name, branch)];

    if !status.is_clean() {
        let mut changes = Vec::new();
        for (count, label) in [
            (status.staged, "staged"),
            (status.modified, "modified"),
            (status.deleted, "deleted"),
            (status.untracked, "untracked"),
        ] {
            if count > 0 {
                changes.push(format!("{} {}", count, label));
            }
        }
        parts.push(changes.join(", "));
    }

    if status.has_upstream {
        if status.ahead > 0 || status.behind > 0 {
            parts.push(format!("ahead {} | behind {}", status.ahead, status.behind));
        }
    } else {
        parts.push("no upstream".to_string());
    }

    parts.join(" | ")
}

pub fn write_statuses(report: &RunReport<RepoStatus>, out: &mut impl Write) -> io::Result<()> {
    for status in report.iter() {
        writeln!(out, "{}", format_status_line(status))?;
    }
    writeln!(out, "{}", Summary::from_report(report))
}

/// One line per outcome. With `full_detail`, multi-line details (diffs,
/// command output) follow their line, indented.
pub fn write_outcomes<K: OutcomeKind>(
    report: &RunReport<Outcome<K>>,
    full_detail: bool,
    out: &mut impl Write,
) -> io::Result<()> {
    for outcome in report.iter() {
        writeln!(out, "{}", outcome)?;
        if let (true, Some(detail)) = (full_detail, outcome.detail.as_deref()) {
            if detail.lines().nth(1).is_some() {
                for line in detail.lines() {
                    writeln!(out, "    {}", line)?;
                }
            }
        }
    }
    writeln!(out, "{}", Summary::from_outcomes(report))
}
