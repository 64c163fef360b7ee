pub mod gate;
pub mod scheduler;
pub mod tracker;

use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum CheckinError {
    #[error(transparent)]
    Client(#[from] boardpass_client::ClientError),
    #[error(transparent)]
    Core(#[from] boardpass_core::CoreError),
}

/// Receives every initialization and polling failure. Reporting never halts
/// a passenger's timer; the same failure may be reported on each tick.
pub trait ErrorReporter: Send + Sync {
    fn report(&self, passenger_id: Uuid, error: &CheckinError);
}

/// Navigation targets of the owning surface.
pub trait Navigator: Send + Sync {
    /// Safe landing state, entered when a failure is surfaced.
    fn to_landing(&self);
    /// Post-submission destination.
    fn to_download(&self);
}
