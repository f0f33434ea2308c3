//! Bounded worker pool
//!
//! Fans one operation out over a slice of items with at most `concurrency`
//! operations in flight. Results land at the index of the item that produced
//! them, progress is reported after every completion, and cancellation is a
//! cooperative poll that stops new dispatch without touching work in flight.
//!
//! All workers are futures driven by the caller's task, so the engine itself
//! never runs in parallel; only the operations' I/O overlaps. The claim step
//! is still an atomic compare-and-swap and the result slots sit behind a
//! mutex, so the pool stays correct if an operation hops threads.

use crate::domain::Progress;
use futures::future::try_join_all;
use std::convert::Infallible;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use tracing::debug;

/// The results of one pool run
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport<R> {
    /// `results[i]` belongs to `items[i]`; `None` means the item was never claimed
    pub results: Vec<Option<R>>,
    /// True if the cancel predicate fired before every item was claimed
    pub cancelled: bool,
}

impl<R> RunReport<R> {
    pub fn empty() -> Self {
        Self {
            results: Vec::new(),
            cancelled: false,
        }
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn completed(&self) -> usize {
        self.results.iter().filter(|r| r.is_some()).count()
    }

    /// Iterate over the results that were produced, in input order
    pub fn iter(&self) -> impl Iterator<Item = &R> {
        self.results.iter().flatten()
    }

    pub fn into_completed(self) -> Vec<R> {
        self.results.into_iter().flatten().collect()
    }
}

/// A claimed unit of work. `index` is the item's position in the input and
/// is never handed out twice.
#[derive(Debug)]
struct Task<'t, T> {
    index: usize,
    item: &'t T,
}

/// Per-run state, owned by a single `try_run` call
struct SchedulerRun<R> {
    total: usize,
    cursor: AtomicUsize,
    completed: AtomicUsize,
    cancelled: AtomicBool,
    results: Mutex<Vec<Option<R>>>,
}

impl<R> SchedulerRun<R> {
    fn new(total: usize) -> Self {
        Self {
            total,
            cursor: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
            cancelled: AtomicBool::new(false),
            results: Mutex::new((0..total).map(|_| None).collect()),
        }
    }

    fn exhausted(&self) -> bool {
        self.cursor.load(Ordering::SeqCst) >= self.total
    }

    /// Claim the next unclaimed index. The cursor never moves past `total`.
    fn claim<'t, T>(&self, items: &'t [T]) -> Option<Task<'t, T>> {
        self.cursor
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |cursor| {
                (cursor < self.total).then_some(cursor + 1)
            })
            .ok()
            .map(|index| Task {
                index,
                item: &items[index],
            })
    }

    /// Store a result and return the new completed count
    fn record(&self, index: usize, value: R) -> usize {
        self.results
            .lock()
            .unwrap_or_else(PoisonError::into_inner)[index] = Some(value);
        self.completed.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn into_report(self) -> RunReport<R> {
        let cancelled = self.cancelled.load(Ordering::SeqCst) && !self.exhausted();
        RunReport {
            results: self
                .results
                .into_inner()
                .unwrap_or_else(PoisonError::into_inner),
            cancelled,
        }
    }
}

type ProgressHook<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;
type CancelHook<'a> = Box<dyn Fn() -> bool + Send + Sync + 'a>;

/// Runs an operation over many items with bounded concurrency
pub struct WorkerPool<'a> {
    concurrency: usize,
    on_progress: Option<ProgressHook<'a>>,
    should_cancel: Option<CancelHook<'a>>,
}

impl<'a> WorkerPool<'a> {
    pub fn new(concurrency: usize) -> Self {
        Self {
            concurrency,
            on_progress: None,
            should_cancel: None,
        }
    }

    /// Called once per completed item, in increasing `completed` order
    pub fn on_progress(mut self, hook: impl Fn(Progress) + Send + Sync + 'a) -> Self {
        self.on_progress = Some(Box::new(hook));
        self
    }

    /// Polled before every claim; once true, no new items are dispatched
    pub fn cancel_when(mut self, predicate: impl Fn() -> bool + Send + Sync + 'a) -> Self {
        self.should_cancel = Some(Box::new(predicate));
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Run an infallible operation. Per-item failures belong in `R`.
    pub async fn run<'s, T, R, F, Fut>(&self, items: &'s [T], op: F) -> RunReport<R>
    where
        F: Fn(&'s T, usize) -> Fut,
        Fut: Future<Output = R>,
    {
        let result = self
            .try_run(items, |item, index| {
                let fut = op(item, index);
                async move { Ok::<R, Infallible>(fut.await) }
            })
            .await;

        match result {
            Ok(report) => report,
            Err(never) => match never {},
        }
    }

    /// Run a fallible operation. The first `Err` aborts the whole run: other
    /// in-flight operations are dropped and the error is returned.
    pub async fn try_run<'s, T, R, E, F, Fut>(
        &self,
        items: &'s [T],
        op: F,
    ) -> Result<RunReport<R>, E>
    where
        F: Fn(&'s T, usize) -> Fut,
        Fut: Future<Output = Result<R, E>>,
    {
        let workers = self.concurrency.min(items.len());
        if workers == 0 {
            return Ok(RunReport::empty());
        }

        debug!("Starting pool run: {} items, {} workers", items.len(), workers);
        let run = SchedulerRun::new(items.len());

        try_join_all((0..workers).map(|worker| self.worker(worker, &run, items, &op))).await?;

        let report = run.into_report();
        debug!(
            "Pool run finished: {}/{} completed, cancelled: {}",
            report.completed(),
            report.total(),
            report.cancelled
        );
        Ok(report)
    }

    async fn worker<'s, T, R, E, F, Fut>(
        &self,
        worker: usize,
        run: &SchedulerRun<R>,
        items: &'s [T],
        op: &F,
    ) -> Result<(), E>
    where
        F: Fn(&'s T, usize) -> Fut,
        Fut: Future<Output = Result<R, E>>,
    {
        loop {
            if run.exhausted() {
                break;
            }
            if self.should_cancel.as_ref().is_some_and(|cancel| cancel()) {
                debug!("Worker {} stopping: cancellation requested", worker);
                run.cancelled.store(true, Ordering::SeqCst);
                break;
            }
            let Some(task) = run.claim(items) else {
                break;
            };

            let value = op(task.item, task.index).await?;
            let completed = run.record(task.index, value);

            if let Some(hook) = &self.on_progress {
                hook(Progress::new(completed, run.total));
            }
        }
        Ok(())
    }
}
