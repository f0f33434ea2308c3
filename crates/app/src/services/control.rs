use crossbeam_channel::Sender;
use gitfleet_core::domain::Progress;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cancellation flag and progress sink shared between a run and its caller
#[derive(Debug, Clone, Default)]
pub struct RunControl {
    cancel: Arc<AtomicBool>,
    progress: Option<Sender<Progress>>,
}

impl RunControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forward progress ticks to a channel (e.g. a renderer thread)
    pub fn with_progress(mut self, sender: Sender<Progress>) -> Self {
        self.progress = Some(sender);
        self
    }

    /// A handle that can request cancellation without keeping the progress
    /// channel open
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        self.cancel.clone()
    }

    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }

    pub fn report(&self, progress: Progress) {
        if let Some(sender) = &self.progress {
            // A renderer that went away is not our problem
            let _ = sender.send(progress);
        }
    }
}
