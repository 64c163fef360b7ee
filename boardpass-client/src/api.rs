use async_trait::async_trait;
use uuid::Uuid;

use boardpass_core::booking::{BookingResponse, CreateBookingRequest};
use boardpass_core::checkin::DccStatusBody;

use crate::ClientResult;

/// Outcome of a per-passenger check-in initialization.
#[derive(Debug, Clone)]
pub struct DccInitialization {
    /// Credential for subsequent status polling.
    pub token: String,
    /// Full initialization payload serialized verbatim, rendered as QR code.
    pub qr_payload: String,
}

/// Outcome of one status probe. The status code is a domain signal
/// (401/410 terminal failure, 204 pending, 200 has-content), never an error.
#[derive(Debug, Clone)]
pub struct DccStatusProbe {
    pub status: u16,
    pub body: Option<DccStatusBody>,
}

#[async_trait]
pub trait BookingApi: Send + Sync {
    /// Create a booking for the given passengers
    async fn create_booking(&self, request: &CreateBookingRequest) -> ClientResult<BookingResponse>;

    /// Obtain the check-in token and QR payload for one passenger
    async fn initialize_checkin(&self, passenger_id: Uuid) -> ClientResult<DccInitialization>;

    /// Probe the verification status for one passenger
    async fn dcc_status(&self, passenger_id: Uuid, token: &str) -> ClientResult<DccStatusProbe>;

    /// Readiness string of the validation service
    async fn validation_status(&self) -> ClientResult<String>;
}
