//! Clerk webhook event envelope.
//!
//! Clerk wraps every change in `{ "type": ..., "object": "event", "data": {...} }`.
//! The shape of `data` depends on the event type and is kept as raw JSON.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A verified Clerk webhook event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClerkEvent {
    /// Event name, e.g. `user.created`
    #[serde(rename = "type")]
    pub event_type: String,
    /// Envelope object tag (always `event` for webhooks)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,
    /// Event-type specific body
    #[serde(default)]
    pub data: Value,
}

impl ClerkEvent {
    /// The `data.id` field, echoed back in the webhook response.
    pub fn data_id(&self) -> Option<&Value> {
        self.data.get("id").filter(|v| !v.is_null())
    }
}
