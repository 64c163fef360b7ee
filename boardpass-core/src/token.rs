use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult};

/// Claims carried by the confirmation payload. Only the issued-at timestamp
/// drives settlement; the rest is kept for display. Unknown claims are
/// ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmationClaims {
    pub iss: Option<String>,
    /// Issued-at, seconds since epoch.
    pub iat: Option<i64>,
    pub sub: Option<String>,
}

/// Reads the claims out of an encoded confirmation token.
///
/// The token is JWT-shaped (`header.payload.signature`). The signature is
/// never checked here; the payload segment is base64url-decoded and parsed
/// as JSON, which is all the expiry evaluation needs.
pub fn decode_confirmation(token: &str) -> CoreResult<ConfirmationClaims> {
    let payload = token
        .split('.')
        .nth(1)
        .ok_or_else(|| CoreError::MalformedToken("missing payload segment".to_string()))?;

    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|e| CoreError::MalformedToken(format!("payload is not base64url: {}", e)))?;

    serde_json::from_slice(&bytes)
        .map_err(|e| CoreError::MalformedToken(format!("payload is not claim JSON: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn encode_token(claims: serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(b"{\"alg\":\"ES256\",\"typ\":\"JWT\"}");
        let payload = URL_SAFE_NO_PAD.encode(claims.to_string().as_bytes());
        format!("{}.{}.sig", header, payload)
    }

    #[test]
    fn test_decode_claims() {
        let token = encode_token(json!({
            "iss": "dcc-validation",
            "iat": 1_624_000_000,
            "sub": "passenger-1",
        }));

        let claims = decode_confirmation(&token).unwrap();
        assert_eq!(claims.iss.as_deref(), Some("dcc-validation"));
        assert_eq!(claims.iat, Some(1_624_000_000));
        assert_eq!(claims.sub.as_deref(), Some("passenger-1"));
    }

    #[test]
    fn test_unknown_claims_ignored() {
        let token = encode_token(json!({
            "iat": 1,
            "category": ["Standard"],
        }));

        let claims = decode_confirmation(&token).unwrap();
        assert_eq!(claims.iat, Some(1));
        assert!(claims.iss.is_none());
    }

    #[test]
    fn test_missing_payload_segment() {
        assert!(decode_confirmation("not-a-token").is_err());
    }

    #[test]
    fn test_garbage_payload() {
        assert!(decode_confirmation("a.%%%.c").is_err());
    }
}
