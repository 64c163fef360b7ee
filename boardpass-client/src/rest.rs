use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use boardpass_core::booking::{BookingResponse, CreateBookingRequest};

use crate::api::{BookingApi, DccInitialization, DccStatusProbe};
use crate::{ClientError, ClientResult};

const CLIENT_CONNECTION_TIMEOUT: u64 = 30; // seconds

/// REST implementation of [`BookingApi`] over a shared reqwest client.
pub struct RestBookingApi {
    base_url: String,
    http: reqwest::Client,
}

impl RestBookingApi {
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(CLIENT_CONNECTION_TIMEOUT))
            .build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Pulls the polling token out of an initialization payload and keeps the
/// payload itself verbatim for QR display.
fn parse_initialization(payload: serde_json::Value) -> ClientResult<DccInitialization> {
    let token = payload
        .get("token")
        .and_then(|v| v.as_str())
        .ok_or_else(|| ClientError::MalformedResponse("initialization payload carries no token".to_string()))?
        .to_string();

    Ok(DccInitialization {
        token,
        qr_payload: payload.to_string(),
    })
}

#[async_trait]
impl BookingApi for RestBookingApi {
    async fn create_booking(&self, request: &CreateBookingRequest) -> ClientResult<BookingResponse> {
        let url = self.url("/booking");
        debug!("Creating booking for {} passenger(s) at {}", request.passengers.len(), url);

        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json().await?)
    }

    async fn initialize_checkin(&self, passenger_id: Uuid) -> ClientResult<DccInitialization> {
        let url = self.url(&format!("/booking/passengers/{}/dcc", passenger_id));
        debug!("Initializing check-in at {}", url);

        let payload = self
            .http
            .post(&url)
            .send()
            .await?
            .error_for_status()?
            .json::<serde_json::Value>()
            .await?;

        parse_initialization(payload)
    }

    async fn dcc_status(&self, passenger_id: Uuid, token: &str) -> ClientResult<DccStatusProbe> {
        let url = self.url(&format!("/booking/passengers/{}/dcc/status", passenger_id));

        let response = self.http.get(&url).bearer_auth(token).send().await?;
        let status = response.status().as_u16();
        debug!("Status probe for passenger {} returned {}", passenger_id, status);

        // Only 200 carries a body worth parsing; 204/401/410 and the rest
        // are reported through the status code alone.
        let body = if status == 200 {
            Some(response.json().await?)
        } else {
            None
        };

        Ok(DccStatusProbe { status, body })
    }

    async fn validation_status(&self) -> ClientResult<String> {
        let url = self.url("/validationStatus");

        let response = self.http.get(&url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_initialization() {
        let payload = json!({
            "token": "chk-token-1",
            "subject": "passenger-1",
            "serviceIdentity": "https://dcc.example/identity",
        });

        let init = parse_initialization(payload.clone()).unwrap();
        assert_eq!(init.token, "chk-token-1");
        // QR payload keeps the whole initialization response
        let round_trip: serde_json::Value = serde_json::from_str(&init.qr_payload).unwrap();
        assert_eq!(round_trip, payload);
    }

    #[test]
    fn test_parse_initialization_without_token() {
        let result = parse_initialization(json!({ "subject": "passenger-1" }));
        assert!(matches!(result, Err(ClientError::MalformedResponse(_))));
    }

    #[tokio::test]
    async fn test_base_url_trimmed() {
        let api = RestBookingApi::new("http://localhost:8080/").unwrap();
        assert_eq!(api.url("/booking"), "http://localhost:8080/booking");
    }
}
