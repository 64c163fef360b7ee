use std::sync::{Arc, Weak};

use futures_util::future::join_all;
use tokio::sync::{broadcast, RwLock};
use tracing::info;
use uuid::Uuid;

use boardpass_client::BookingApi;
use boardpass_core::booking::Passenger;
use boardpass_core::checkin::CheckinPassenger;
use boardpass_core::clock::Clock;
use boardpass_core::settlement::{self, PollDecision};
use boardpass_core::token::decode_confirmation;

use crate::scheduler::{PollScheduler, PollTick};
use crate::ErrorReporter;

/// Ordered clone of the tracked passengers, published after every update.
pub type Snapshot = Vec<CheckinPassenger>;

const SNAPSHOT_CHANNEL_CAPACITY: usize = 100;

/// Authoritative owner of the check-in state.
///
/// Holds the mutable [`CheckinPassenger`] collection, runs the
/// initialization fan-out, applies each poll tick's observation in place and
/// broadcasts a fresh snapshot so the presentation surface reflects partial
/// progress. Collaborators arrive through the constructor; nothing is read
/// from ambient scope.
pub struct CheckinTracker {
    weak_self: Weak<CheckinTracker>,
    api: Arc<dyn BookingApi>,
    scheduler: Arc<PollScheduler>,
    clock: Arc<dyn Clock>,
    reporter: Arc<dyn ErrorReporter>,
    passengers: RwLock<Vec<CheckinPassenger>>,
    snapshot_tx: broadcast::Sender<Snapshot>,
}

impl CheckinTracker {
    pub fn new(
        api: Arc<dyn BookingApi>,
        scheduler: Arc<PollScheduler>,
        clock: Arc<dyn Clock>,
        reporter: Arc<dyn ErrorReporter>,
    ) -> Arc<Self> {
        let (snapshot_tx, _) = broadcast::channel(SNAPSHOT_CHANNEL_CAPACITY);

        Arc::new_cyclic(|weak| Self {
            weak_self: weak.clone(),
            api,
            scheduler,
            clock,
            reporter,
            passengers: RwLock::new(Vec::new()),
            snapshot_tx,
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Snapshot> {
        self.snapshot_tx.subscribe()
    }

    pub async fn snapshot(&self) -> Snapshot {
        self.passengers.read().await.clone()
    }

    pub fn scheduler(&self) -> &Arc<PollScheduler> {
        &self.scheduler
    }

    /// Runs check-in initialization for a booking's passengers.
    ///
    /// All initialization requests are issued concurrently and may complete
    /// in any order; the snapshot goes out exactly once, after the last one
    /// settles. A passenger whose request failed stays tracked without a
    /// token and is never polled; the failure goes to the reporter and does
    /// not abort its siblings.
    pub async fn initialize(&self, passengers: &[Passenger]) {
        let requests = passengers.iter().map(|passenger| {
            let api = Arc::clone(&self.api);
            let passenger = passenger.clone();
            async move {
                let outcome = api.initialize_checkin(passenger.id).await;
                (passenger, outcome)
            }
        });

        let settled = join_all(requests).await;

        let mut tracked = Vec::with_capacity(settled.len());
        let mut poll_ready = Vec::new();
        for (passenger, outcome) in settled {
            let mut entry = CheckinPassenger::new(passenger);
            match outcome {
                Ok(init) => {
                    entry.token = Some(init.token);
                    entry.qr_code = Some(init.qr_payload);
                    poll_ready.push(entry.id());
                }
                Err(e) => {
                    self.reporter.report(entry.id(), &e.into());
                }
            }
            tracked.push(entry);
        }

        info!(
            "Check-in initialized: {} tracked, {} polling",
            tracked.len(),
            poll_ready.len()
        );

        {
            let mut slot = self.passengers.write().await;
            *slot = tracked;
        }
        self.publish().await;

        for passenger_id in poll_ready {
            self.start_polling(passenger_id);
        }
    }

    /// One status check for one passenger.
    ///
    /// The entry is resolved by id from the live collection at tick time. A
    /// transport failure is reported and leaves the timer armed. The snapshot
    /// is republished after every tick, success or failure.
    pub async fn poll_once(&self, passenger_id: Uuid) -> PollDecision {
        let token = {
            let passengers = self.passengers.read().await;
            match passengers.iter().find(|p| p.id() == passenger_id) {
                Some(entry) => entry.token.clone(),
                None => return PollDecision::Continue,
            }
        };
        let token = match token {
            Some(token) => token,
            None => return PollDecision::Continue,
        };

        match self.api.dcc_status(passenger_id, &token).await {
            Ok(probe) => {
                let mut passengers = self.passengers.write().await;
                if let Some(entry) = passengers.iter_mut().find(|p| p.id() == passenger_id) {
                    entry.status = Some(probe.status);
                    if let Some(body) = probe.body {
                        if let Some(confirmation) = body.confirmation.clone() {
                            match decode_confirmation(&confirmation) {
                                Ok(claims) => entry.parsed_token = Some(claims),
                                Err(e) => self.reporter.report(passenger_id, &e.into()),
                            }
                            entry.result = Some(body);
                        }
                    }
                }
            }
            Err(e) => self.reporter.report(passenger_id, &e.into()),
        }

        let decision = {
            let passengers = self.passengers.read().await;
            passengers
                .iter()
                .find(|p| p.id() == passenger_id)
                .map(|entry| settlement::evaluate(entry, self.clock.now()))
                .unwrap_or(PollDecision::Continue)
        };

        self.publish().await;
        decision
    }

    /// Cancels every outstanding timer for this tracker.
    pub fn teardown(&self) {
        self.scheduler.teardown();
    }

    fn start_polling(&self, passenger_id: Uuid) {
        let tracker = self.weak_self.clone();
        let tick: PollTick = Box::new(move || {
            let tracker = tracker.clone();
            Box::pin(async move {
                match tracker.upgrade() {
                    Some(tracker) => tracker.poll_once(passenger_id).await,
                    // owning context is gone; settle the orphaned timer
                    None => PollDecision::Settled,
                }
            })
        });

        self.scheduler.start_polling(passenger_id, tick);
    }

    async fn publish(&self) {
        let snapshot = self.passengers.read().await.clone();
        let _ = self.snapshot_tx.send(snapshot);
    }
}
