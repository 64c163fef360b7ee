pub mod booking;
pub mod checkin;
pub mod clock;
pub mod settlement;
pub mod token;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Malformed confirmation token: {0}")]
    MalformedToken(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
