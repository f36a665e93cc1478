//! Identity-provider webhook verification and event parsing.
//!
//! The provider signs each delivery with HMAC-SHA256 over
//! `{id}.{timestamp}.{body}` using a base64 secret carried in a
//! `whsec_`-prefixed string; the signature header holds one or more
//! space-separated `v1,<base64>` entries.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Deliveries with timestamps further than this from now are rejected,
/// bounding the replay window.
const TIMESTAMP_TOLERANCE_SECS: i64 = 5 * 60;

#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("webhook secret is not valid base64")]
    MalformedSecret,

    #[error("timestamp header is not a unix timestamp")]
    BadTimestamp,

    #[error("timestamp outside the accepted window")]
    TimestampOutOfRange,

    #[error("no signature matched the payload")]
    InvalidSignature,
}

/// Verifier for one configured endpoint secret.
pub struct SignatureVerifier {
    mac: HmacSha256,
}

impl SignatureVerifier {
    pub fn new(secret: &str) -> Result<Self, WebhookError> {
        let encoded = secret.strip_prefix("whsec_").unwrap_or(secret);
        let key = BASE64
            .decode(encoded)
            .map_err(|_| WebhookError::MalformedSecret)?;
        let mac =
            HmacSha256::new_from_slice(&key).map_err(|_| WebhookError::MalformedSecret)?;
        Ok(Self { mac })
    }

    /// Produce the `v1,<base64>` signature for a delivery. Tests and local
    /// tooling use this to forge valid deliveries.
    pub fn sign(&self, msg_id: &str, timestamp: i64, payload: &[u8]) -> String {
        let mut mac = self.mac.clone();
        mac.update(format!("{}.{}.", msg_id, timestamp).as_bytes());
        mac.update(payload);
        format!("v1,{}", BASE64.encode(mac.finalize().into_bytes()))
    }

    /// Verify a delivery against its three signature headers. Comparison is
    /// constant-time; any one matching `v1` entry accepts the delivery.
    pub fn verify(
        &self,
        msg_id: &str,
        timestamp: &str,
        signature_header: &str,
        payload: &[u8],
        now: DateTime<Utc>,
    ) -> Result<(), WebhookError> {
        let ts: i64 = timestamp.parse().map_err(|_| WebhookError::BadTimestamp)?;
        if (now.timestamp() - ts).abs() > TIMESTAMP_TOLERANCE_SECS {
            return Err(WebhookError::TimestampOutOfRange);
        }

        let mut mac = self.mac.clone();
        // The raw header value is part of the signed content
        mac.update(format!("{}.{}.", msg_id, timestamp).as_bytes());
        mac.update(payload);

        for entry in signature_header.split_whitespace() {
            let Some(encoded) = entry.strip_prefix("v1,") else {
                continue;
            };
            let Ok(candidate) = BASE64.decode(encoded) else {
                continue;
            };
            if mac.clone().verify_slice(&candidate).is_ok() {
                return Ok(());
            }
        }

        Err(WebhookError::InvalidSignature)
    }
}

/// Event envelope delivered by the identity provider.
#[derive(Debug, Deserialize)]
pub struct IdentityEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub data: EventData,
}

#[derive(Debug, Default, Deserialize)]
pub struct EventData {
    /// Subject id, e.g. the newly created user's external id.
    pub id: Option<String>,
    #[serde(default)]
    pub email_addresses: Vec<EmailAddress>,
    pub primary_email_address_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EmailAddress {
    pub id: String,
    pub email_address: String,
}

impl EventData {
    /// The address the provider designates canonical for this user.
    pub fn primary_email(&self) -> Option<&str> {
        let primary_id = self.primary_email_address_id.as_deref()?;
        self.email_addresses
            .iter()
            .find(|email| email.id == primary_id)
            .map(|email| email.email_address.as_str())
    }
}
