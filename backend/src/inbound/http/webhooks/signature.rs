//! Svix-style webhook signature verification.
//!
//! The signed content is `{svix-id}.{svix-timestamp}.{body}`, authenticated
//! with HMAC-SHA256 under the base64 key that follows the `whsec_` prefix of
//! the signing secret. `svix-signature` holds space-separated `v1,<base64>`
//! entries; any one matching entry accepts the delivery.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

const SECRET_PREFIX: &str = "whsec_";
const SIGNATURE_VERSION: &str = "v1";

/// Maximum clock skew, in seconds, accepted between sender and receiver.
pub const TIMESTAMP_TOLERANCE_SECS: i64 = 5 * 60;

/// The signing secret could not be turned into a key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WebhookSecretError {
    #[error("webhook signing secret is empty")]
    Empty,
    #[error("webhook signing secret is not valid base64: {message}")]
    Encoding { message: String },
    #[error("webhook signing key rejected: {message}")]
    Key { message: String },
}

/// Why a delivery was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    #[error("missing {0} header")]
    MissingHeader(&'static str),
    #[error("svix-timestamp is not a unix timestamp")]
    InvalidTimestamp,
    #[error("svix-timestamp is outside the accepted tolerance")]
    TimestampOutOfTolerance,
    #[error("no matching signature")]
    NoMatchingSignature,
}

/// Signature headers of one delivery.
#[derive(Debug, Clone, Copy)]
pub struct SignatureHeaders<'a> {
    pub id: Option<&'a str>,
    pub timestamp: Option<&'a str>,
    pub signature: Option<&'a str>,
}

/// Verifies identity-provider webhook deliveries.
#[derive(Clone)]
pub struct WebhookVerifier {
    mac: HmacSha256,
}

impl fmt::Debug for WebhookVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebhookVerifier").finish_non_exhaustive()
    }
}

impl WebhookVerifier {
    /// Build a verifier from a `whsec_…` secret. A bare base64 key is also
    /// accepted.
    pub fn new(secret: &str) -> Result<Self, WebhookSecretError> {
        let encoded = secret.trim();
        let encoded = encoded.strip_prefix(SECRET_PREFIX).unwrap_or(encoded);
        if encoded.is_empty() {
            return Err(WebhookSecretError::Empty);
        }
        let key = STANDARD
            .decode(encoded)
            .map_err(|err| WebhookSecretError::Encoding {
                message: err.to_string(),
            })?;
        let mac = HmacSha256::new_from_slice(&key).map_err(|err| WebhookSecretError::Key {
            message: err.to_string(),
        })?;
        Ok(Self { mac })
    }

    /// Base64 signature of a delivery, without the version prefix.
    pub fn sign(&self, id: &str, timestamp: &str, body: &[u8]) -> String {
        STANDARD.encode(self.digest(id, timestamp, body))
    }

    /// Check the headers and body of a delivery received at `now`.
    pub fn verify(
        &self,
        headers: SignatureHeaders<'_>,
        body: &[u8],
        now: DateTime<Utc>,
    ) -> Result<(), SignatureError> {
        let id = headers.id.ok_or(SignatureError::MissingHeader("svix-id"))?;
        let timestamp = headers
            .timestamp
            .ok_or(SignatureError::MissingHeader("svix-timestamp"))?;
        let signature = headers
            .signature
            .ok_or(SignatureError::MissingHeader("svix-signature"))?;

        let sent_at = timestamp
            .trim()
            .parse::<i64>()
            .ok()
            .and_then(|seconds| DateTime::from_timestamp(seconds, 0))
            .ok_or(SignatureError::InvalidTimestamp)?;
        if (now - sent_at).num_seconds().abs() > TIMESTAMP_TOLERANCE_SECS {
            return Err(SignatureError::TimestampOutOfTolerance);
        }

        let expected = self.digest(id, timestamp, body);
        let matched = signature
            .split_whitespace()
            .filter_map(|entry| entry.split_once(','))
            .filter(|(version, _)| *version == SIGNATURE_VERSION)
            .filter_map(|(_, encoded)| STANDARD.decode(encoded).ok())
            .any(|candidate| bool::from(candidate.as_slice().ct_eq(expected.as_slice())));
        if matched {
            Ok(())
        } else {
            Err(SignatureError::NoMatchingSignature)
        }
    }

    fn digest(&self, id: &str, timestamp: &str, body: &[u8]) -> Vec<u8> {
        let mut mac = self.mac.clone();
        mac.update(id.as_bytes());
        mac.update(b".");
        mac.update(timestamp.as_bytes());
        mac.update(b".");
        mac.update(body);
        mac.finalize().into_bytes().to_vec()
    }
}
