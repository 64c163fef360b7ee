use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::warn;

use crate::tracker::CheckinTracker;
use crate::Navigator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Proceeded,
    Blocked,
}

/// Decides on user-initiated submit whether check-in moves to the next stage.
///
/// Submission proceeds only when every tracked passenger is verified OK;
/// otherwise a blocking modal is raised and navigation stays put.
pub struct SubmissionGate {
    tracker: Arc<CheckinTracker>,
    navigator: Arc<dyn Navigator>,
    modal_visible: AtomicBool,
}

impl SubmissionGate {
    pub fn new(tracker: Arc<CheckinTracker>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            tracker,
            navigator,
            modal_visible: AtomicBool::new(false),
        }
    }

    pub async fn submit(&self) -> SubmitOutcome {
        let snapshot = self.tracker.snapshot().await;

        if snapshot.iter().all(|entry| entry.is_verified_ok()) {
            self.navigator.to_download();
            SubmitOutcome::Proceeded
        } else {
            warn!("Submission blocked: not every passenger is verified");
            self.modal_visible.store(true, Ordering::SeqCst);
            SubmitOutcome::Blocked
        }
    }

    pub fn modal_visible(&self) -> bool {
        self.modal_visible.load(Ordering::SeqCst)
    }

    pub fn dismiss_modal(&self) {
        self.modal_visible.store(false, Ordering::SeqCst);
    }
}
