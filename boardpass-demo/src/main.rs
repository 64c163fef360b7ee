mod app_config;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use boardpass_checkin::gate::{SubmissionGate, SubmitOutcome};
use boardpass_checkin::scheduler::PollScheduler;
use boardpass_checkin::tracker::CheckinTracker;
use boardpass_checkin::{CheckinError, ErrorReporter, Navigator};
use boardpass_client::{BookingApi, RestBookingApi};
use boardpass_core::booking::{CreateBookingRequest, PassengerDraft};
use boardpass_core::checkin::CheckinPassenger;
use boardpass_core::clock::SystemClock;
use boardpass_core::settlement;

/// Terminal stand-in for the wizard's page transitions.
struct ConsoleNavigator;

impl Navigator for ConsoleNavigator {
    fn to_landing(&self) {
        info!("Returning to the landing page");
    }

    fn to_download(&self) {
        info!("Check-in complete, continuing to boarding pass download");
    }
}

/// Logs every surfaced failure and sends the user back to a safe state.
struct ConsoleReporter {
    navigator: Arc<dyn Navigator>,
}

impl ErrorReporter for ConsoleReporter {
    fn report(&self, passenger_id: uuid::Uuid, error: &CheckinError) {
        error!("Check-in error for passenger {}: {}", passenger_id, error);
        self.navigator.to_landing();
    }
}

fn render(snapshot: &[CheckinPassenger]) {
    for entry in snapshot {
        let status = entry
            .status
            .map(|code| code.to_string())
            .unwrap_or_else(|| "-".to_string());
        info!(
            "{:<28} status {:>3} {:?}",
            entry.passenger.full_name(),
            status,
            settlement::classify(entry)
        );
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "boardpass_demo=info,boardpass_checkin=info,boardpass_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = app_config::Config::load().context("Failed to load config")?;
    info!("Booking API at {}", config.api.base_url);

    let api = Arc::new(RestBookingApi::new(&config.api.base_url)?);

    match api.validation_status().await {
        Ok(status) => info!("Validation service reports: {}", status),
        Err(e) => warn!("Validation service status unavailable: {}", e),
    }

    let request = CreateBookingRequest {
        passengers: config
            .booking
            .passengers
            .iter()
            .map(|p| PassengerDraft {
                first_name: p.first_name.clone(),
                last_name: p.last_name.clone(),
                date_of_birth: None,
            })
            .collect(),
    };

    let booking = api.create_booking(&request).await.context("Booking request failed")?;
    info!(
        "Booking {} confirmed: {} -> {}, {} passenger(s)",
        booking.reference,
        booking.flight_info.from,
        booking.flight_info.to,
        booking.passengers.len()
    );

    let scheduler = PollScheduler::with_cadence(
        Duration::from_millis(config.polling.initial_delay_ms),
        Duration::from_millis(config.polling.interval_ms),
    );
    let navigator: Arc<dyn Navigator> = Arc::new(ConsoleNavigator);
    let reporter = Arc::new(ConsoleReporter {
        navigator: Arc::clone(&navigator),
    });

    let tracker = CheckinTracker::new(
        Arc::clone(&api) as Arc<dyn BookingApi>,
        scheduler,
        Arc::new(SystemClock),
        reporter,
    );
    let gate = SubmissionGate::new(Arc::clone(&tracker), Arc::clone(&navigator));

    let mut snapshots = tracker.subscribe();
    tracker.initialize(&booking.passengers).await;

    loop {
        tokio::select! {
            snapshot = snapshots.recv() => {
                match snapshot {
                    Ok(snapshot) => {
                        render(&snapshot);
                        if snapshot.iter().all(|entry| entry.is_verified_ok())
                            && gate.submit().await == SubmitOutcome::Proceeded
                        {
                            break;
                        }
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!("Renderer lagged, skipped {} snapshot(s)", skipped);
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, cancelling outstanding checks");
                break;
            }
        }
    }

    tracker.teardown();
    Ok(())
}
