use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::booking::Passenger;
use crate::token::ConfirmationClaims;

/// Verdict of a certificate check as reported by the verification endpoint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DccResult {
    OK,
    NOK,
    CHK,
}

/// One detail record of a performed check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckDetail {
    pub identifier: Option<String>,
    pub details: String,
}

/// Body of a status response, present once the endpoint has content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DccStatusBody {
    pub result: Option<DccResult>,
    #[serde(default)]
    pub results: Vec<CheckDetail>,
    pub confirmation: Option<String>,
}

/// Mutable per-passenger check-in record, updated in place by its own
/// polling cycle. Timer ownership lives in the scheduler, not here.
#[derive(Debug, Clone, Serialize)]
pub struct CheckinPassenger {
    pub passenger: Passenger,
    /// Credential obtained during initialization; required before polling.
    pub token: Option<String>,
    /// Initialization payload serialized verbatim, display only.
    pub qr_code: Option<String>,
    /// Last observed HTTP-style status code. None = not yet polled.
    pub status: Option<u16>,
    /// Set only once a response carrying a confirmation payload arrived.
    pub result: Option<DccStatusBody>,
    pub parsed_token: Option<ConfirmationClaims>,
}

impl CheckinPassenger {
    pub fn new(passenger: Passenger) -> Self {
        Self {
            passenger,
            token: None,
            qr_code: None,
            status: None,
            result: None,
            parsed_token: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.passenger.id
    }

    /// Whether the verification endpoint has confirmed this passenger valid.
    pub fn is_verified_ok(&self) -> bool {
        matches!(&self.result, Some(body) if body.result == Some(DccResult::OK))
    }
}
