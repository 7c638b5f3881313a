//! Admin session token carried in the `admin-session` cookie.
//!
//! The cookie value is standard base64 over a JSON object `{"adminId": "...", "exp": <ms>}`.
//! Encoding and decoding are kept separate from expiry checks so callers can tell a
//! malformed cookie from an expired one, even though the router treats both the same.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Emits padded output, accepts input with or without padding.
const TOKEN_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session token is not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),
    #[error("session payload is malformed: {0}")]
    Payload(#[from] serde_json::Error),
    #[error("session expired at {exp} (now {now})")]
    Expired { exp: i64, now: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSession {
    pub admin_id: String,
    /// Expiry in epoch milliseconds.
    pub exp: i64,
}

impl AdminSession {
    pub fn issue(admin_id: impl Into<String>, ttl: Duration, now_ms: i64) -> Self {
        Self { admin_id: admin_id.into(), exp: now_ms.saturating_add(ttl.num_milliseconds()) }
    }

    pub fn encode(&self) -> String {
        // Serializing a struct of a String and an i64 cannot fail.
        let json = serde_json::to_vec(self).unwrap_or_default();
        TOKEN_ENGINE.encode(json)
    }

    pub fn decode(raw: &str) -> Result<Self, SessionError> {
        let bytes = TOKEN_ENGINE.decode(raw.trim())?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub fn is_expired(&self, now_ms: i64) -> bool {
        self.exp <= now_ms
    }

    /// Decodes and checks expiry in one step.
    pub fn validate(raw: &str, now_ms: i64) -> Result<Self, SessionError> {
        let session = Self::decode(raw)?;
        if session.is_expired(now_ms) {
            return Err(SessionError::Expired { exp: session.exp, now: now_ms });
        }
        Ok(session)
    }
}
