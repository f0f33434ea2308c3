use crate::domain::{Outcome, OutcomeKind};
use crate::pool::RunReport;
use std::fmt;

/// Read-only tally of a finished run, for the final report line
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub processed: usize,
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
    pub cancelled: bool,
}

impl Summary {
    /// Tally a report of outcomes. Non-success kinds whose tag is `skipped`
    /// are counted separately from failures.
    pub fn from_outcomes<K: OutcomeKind>(report: &RunReport<Outcome<K>>) -> Self {
        let mut summary = Self {
            total: report.total(),
            cancelled: report.cancelled,
            ..Self::default()
        };

        for outcome in report.iter() {
            summary.processed += 1;
            if outcome.success {
                summary.succeeded += 1;
            } else if outcome.kind.as_str() == "skipped" {
                summary.skipped += 1;
            } else {
                summary.failed += 1;
            }
        }

        summary
    }

    /// Tally a report where every produced value counts as a success
    pub fn from_report<R>(report: &RunReport<R>) -> Self {
        let processed = report.completed();
        Self {
            total: report.total(),
            processed,
            succeeded: processed,
            cancelled: report.cancelled,
            ..Self::default()
        }
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of {} processed", self.processed, self.total)?;
        write!(
            f,
            " ({} ok, {} skipped, {} failed)",
            self.succeeded, self.skipped, self.failed
        )?;
        if self.cancelled {
            write!(f, " - cancelled")?;
        }
        Ok(())
    }
}
