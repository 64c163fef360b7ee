pub mod api;
pub mod rest;

pub use api::{BookingApi, DccInitialization, DccStatusProbe};
pub use rest::RestBookingApi;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

pub type ClientResult<T> = Result<T, ClientError>;
