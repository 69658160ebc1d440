//! Clerk webhook signature verification.
//!
//! Clerk delivers webhooks through Svix, which signs each request using
//! HMAC-SHA256 over `"{svix-id}.{svix-timestamp}.{body}"`.
//! Reference: https://docs.svix.com/receiving/verifying-payloads/how-manual

use std::time::{SystemTime, UNIX_EPOCH};

use axum::http::HeaderMap;
use base64::{engine::general_purpose::STANDARD, Engine};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;
use tracing::warn;

use crate::event::ClerkEvent;

type HmacSha256 = Hmac<Sha256>;

pub const SVIX_ID_HEADER: &str = "svix-id";
pub const SVIX_TIMESTAMP_HEADER: &str = "svix-timestamp";
pub const SVIX_SIGNATURE_HEADER: &str = "svix-signature";

const SECRET_PREFIX: &str = "whsec_";
const SIGNATURE_VERSION: &str = "v1";

/// Reasons a webhook fails verification.
#[derive(Debug, Error)]
pub enum SignatureError {
    #[error("webhook secret is not valid base64")]
    InvalidSecret,

    #[error("invalid signature timestamp")]
    InvalidTimestamp,

    #[error("message timestamp too old")]
    TimestampTooOld,

    #[error("message timestamp too new")]
    TimestampTooNew,

    #[error("no matching signature found")]
    NoMatchingSignature,

    #[error("invalid event payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),
}

/// The three Svix headers required on every webhook.
#[derive(Debug, Clone, Copy)]
pub struct SvixHeaders<'a> {
    pub id: &'a str,
    pub timestamp: &'a str,
    pub signature: &'a str,
}

impl<'a> SvixHeaders<'a> {
    /// Pull the Svix headers out of a request, `None` if any is absent or empty.
    pub fn from_headers(headers: &'a HeaderMap) -> Option<Self> {
        let get = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .filter(|v| !v.is_empty())
        };

        Some(Self {
            id: get(SVIX_ID_HEADER)?,
            timestamp: get(SVIX_TIMESTAMP_HEADER)?,
            signature: get(SVIX_SIGNATURE_HEADER)?,
        })
    }
}

/// Verifies Svix-signed webhooks against a shared secret.
///
/// The secret is decoded and keyed once at startup.
#[derive(Clone)]
pub struct SvixVerifier {
    mac: HmacSha256,
    tolerance_secs: u64,
}

impl std::fmt::Debug for SvixVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SvixVerifier")
            .field("tolerance_secs", &self.tolerance_secs)
            .finish_non_exhaustive()
    }
}

impl SvixVerifier {
    /// Build a verifier from a `whsec_...` secret.
    ///
    /// # Arguments
    ///
    /// * `secret` - The signing secret from the Clerk dashboard, with or without the `whsec_` prefix
    /// * `tolerance_secs` - Maximum allowed clock skew of the `svix-timestamp` header
    pub fn new(secret: &str, tolerance_secs: u64) -> Result<Self, SignatureError> {
        let encoded = secret.strip_prefix(SECRET_PREFIX).unwrap_or(secret);
        let key = STANDARD
            .decode(encoded)
            .map_err(|_| SignatureError::InvalidSecret)?;

        if key.is_empty() {
            return Err(SignatureError::InvalidSecret);
        }

        let mac = HmacSha256::new_from_slice(&key).map_err(|_| SignatureError::InvalidSecret)?;

        Ok(Self {
            mac,
            tolerance_secs,
        })
    }

    /// Verify a webhook and parse its body into a [`ClerkEvent`].
    pub fn verify(&self, headers: &SvixHeaders<'_>, body: &[u8]) -> Result<ClerkEvent, SignatureError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();

        self.verify_at(headers, body, now)
    }

    /// Verify a webhook against an explicit current time (unix seconds).
    pub fn verify_at(
        &self,
        headers: &SvixHeaders<'_>,
        body: &[u8],
        now: u64,
    ) -> Result<ClerkEvent, SignatureError> {
        let webhook_time: u64 = headers.timestamp.trim().parse().map_err(|_| {
            warn!(timestamp = %headers.timestamp, "svix_signature_invalid_timestamp");
            SignatureError::InvalidTimestamp
        })?;

        if now > webhook_time.saturating_add(self.tolerance_secs) {
            warn!(
                webhook_time = webhook_time,
                current_time = now,
                max_age_seconds = self.tolerance_secs,
                "svix_signature_stale"
            );
            return Err(SignatureError::TimestampTooOld);
        }

        if webhook_time > now.saturating_add(self.tolerance_secs) {
            warn!(
                webhook_time = webhook_time,
                current_time = now,
                max_age_seconds = self.tolerance_secs,
                "svix_signature_future"
            );
            return Err(SignatureError::TimestampTooNew);
        }

        let mac = self.signed_mac(headers.id, headers.timestamp, body);

        let matched = headers
            .signature
            .split_whitespace()
            .filter_map(|entry| entry.split_once(','))
            .filter(|(version, _)| *version == SIGNATURE_VERSION)
            .filter_map(|(_, signature)| STANDARD.decode(signature).ok())
            .any(|signature| mac.clone().verify_slice(&signature).is_ok());

        if !matched {
            warn!(
                msg_id = %headers.id,
                signature_count = headers.signature.split_whitespace().count(),
                "svix_signature_mismatch"
            );
            return Err(SignatureError::NoMatchingSignature);
        }

        Ok(serde_json::from_slice(body)?)
    }

    /// Compute the `v1,<base64>` signature for a message.
    pub fn sign(&self, msg_id: &str, timestamp: &str, body: &[u8]) -> String {
        let signature = self.signed_mac(msg_id, timestamp, body).finalize().into_bytes();
        format!("{},{}", SIGNATURE_VERSION, STANDARD.encode(signature))
    }

    fn signed_mac(&self, msg_id: &str, timestamp: &str, body: &[u8]) -> HmacSha256 {
        let mut mac = self.mac.clone();
        mac.update(msg_id.as_bytes());
        mac.update(b".");
        mac.update(timestamp.as_bytes());
        mac.update(b".");
        mac.update(body);
        mac
    }
}
