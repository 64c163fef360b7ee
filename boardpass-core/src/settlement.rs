use chrono::{DateTime, Utc};

use crate::checkin::{CheckinPassenger, DccResult};

/// Whether a passenger's verification polling should carry on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollDecision {
    Continue,
    Settled,
}

/// Decides from a passenger's current observed state whether polling stops.
///
/// Polling settles when the verification result is OK, or when the decoded
/// confirmation carries an issued-at timestamp already in the past. An
/// invalid (NOK) or needs-manual-check (CHK) verdict keeps being re-checked
/// until it turns OK or the confirmation expires.
pub fn evaluate(passenger: &CheckinPassenger, now: DateTime<Utc>) -> PollDecision {
    if passenger.is_verified_ok() {
        return PollDecision::Settled;
    }

    let expired = passenger
        .parsed_token
        .as_ref()
        .and_then(|claims| claims.iat)
        .map(|iat| iat * 1000 < now.timestamp_millis())
        .unwrap_or(false);

    if expired {
        PollDecision::Settled
    } else {
        PollDecision::Continue
    }
}

/// Presentation-facing bucket for a passenger's current verification state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Pass,
    Fail,
    Warn,
    Pending,
}

/// Maps the last observed status code and verdict onto a display class.
pub fn classify(passenger: &CheckinPassenger) -> StatusClass {
    match passenger.status {
        Some(200) => match passenger.result.as_ref().and_then(|body| body.result) {
            Some(DccResult::OK) => StatusClass::Pass,
            Some(DccResult::NOK) => StatusClass::Fail,
            Some(DccResult::CHK) => StatusClass::Warn,
            None => StatusClass::Pending,
        },
        Some(401) | Some(410) => StatusClass::Fail,
        _ => StatusClass::Pending,
    }
}
