use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::debug;
use uuid::Uuid;

use boardpass_core::settlement::PollDecision;

/// Delay before a passenger's first status check.
pub const POLL_INITIAL_DELAY: Duration = Duration::from_millis(5000);
/// Cadence of the rechecks that follow.
pub const POLL_INTERVAL: Duration = Duration::from_millis(5000);

/// One poll tick. Returns whether the passenger's polling should carry on.
pub type PollTick =
    Box<dyn Fn() -> Pin<Box<dyn Future<Output = PollDecision> + Send>> + Send + Sync>;

/// Drives the per-passenger polling timers.
///
/// Each passenger gets its own spawned task: one initial delay, a first
/// check, then rechecks on a fixed interval until the tick reports
/// settlement or the timer is cancelled. Task handles live in a map keyed by
/// passenger id; the tracked domain records never own timer resources.
pub struct PollScheduler {
    weak_self: Weak<PollScheduler>,
    initial_delay: Duration,
    interval: Duration,
    handles: Mutex<HashMap<Uuid, JoinHandle<()>>>,
}

impl PollScheduler {
    pub fn new() -> Arc<Self> {
        Self::with_cadence(POLL_INITIAL_DELAY, POLL_INTERVAL)
    }

    /// Cadence override, used by tests and configuration.
    pub fn with_cadence(initial_delay: Duration, interval: Duration) -> Arc<Self> {
        Arc::new_cyclic(|weak| Self {
            weak_self: weak.clone(),
            initial_delay,
            interval,
            handles: Mutex::new(HashMap::new()),
        })
    }

    /// Arms the polling timer for one passenger.
    ///
    /// Restarting an id that is already polling replaces its timer. When the
    /// tick settles, the task removes its own map entry on the way out.
    pub fn start_polling(&self, passenger_id: Uuid, tick: PollTick) {
        let scheduler = self.weak_self.clone();
        let initial_delay = self.initial_delay;
        let interval = self.interval;

        let handle = tokio::spawn(async move {
            sleep(initial_delay).await;
            loop {
                if tick().await == PollDecision::Settled {
                    break;
                }
                sleep(interval).await;
            }

            debug!("Polling settled for passenger {}", passenger_id);
            if let Some(scheduler) = scheduler.upgrade() {
                scheduler.finish(passenger_id);
            }
        });

        let mut handles = self.handles.lock().expect("poll handle map poisoned");
        if let Some(previous) = handles.insert(passenger_id, handle) {
            previous.abort();
        }
    }

    /// Cancels one passenger's timer. No-op when it is not polling.
    pub fn stop_polling(&self, passenger_id: Uuid) {
        let removed = {
            let mut handles = self.handles.lock().expect("poll handle map poisoned");
            handles.remove(&passenger_id)
        };

        if let Some(handle) = removed {
            handle.abort();
            debug!("Stopped polling for passenger {}", passenger_id);
        }
    }

    pub fn is_polling(&self, passenger_id: Uuid) -> bool {
        let handles = self.handles.lock().expect("poll handle map poisoned");
        handles
            .get(&passenger_id)
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }

    pub fn active_count(&self) -> usize {
        let handles = self.handles.lock().expect("poll handle map poisoned");
        handles.values().filter(|handle| !handle.is_finished()).count()
    }

    /// Cancels every outstanding timer, initial delays included. Safe to call
    /// when nothing ever started.
    pub fn teardown(&self) {
        let drained: Vec<(Uuid, JoinHandle<()>)> = {
            let mut handles = self.handles.lock().expect("poll handle map poisoned");
            handles.drain().collect()
        };

        if !drained.is_empty() {
            debug!("Tearing down {} poll timer(s)", drained.len());
        }
        for (_, handle) in drained {
            handle.abort();
        }
    }

    fn finish(&self, passenger_id: Uuid) {
        let mut handles = self.handles.lock().expect("poll handle map poisoned");
        handles.remove(&passenger_id);
    }
}

impl Drop for PollScheduler {
    fn drop(&mut self) {
        self.teardown();
    }
}
