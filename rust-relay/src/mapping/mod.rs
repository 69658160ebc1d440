//! Clerk event → Novu trigger mapping.
//!
//! This module turns a verified Clerk event into everything needed for a
//! Novu trigger: the workflow id, the subscriber and the payload.
//!
//! ## Mapping Flow
//!
//! ```text
//! (event type, data) → map_event() → MappedEvent { workflow_id, subscriber, payload }
//! ```
//!
//! The mapping is a pure function of its inputs.

pub mod context;
pub mod payload;
pub mod subscriber;
pub mod workflow;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::info;

use crate::config::{Config, DEFAULT_APP_LOGO_URL, DEFAULT_SUBSCRIBER_EMAIL};

pub use context::EventContext;
pub use payload::{build_payload, encode_uri_component};
pub use subscriber::{build_subscriber, derive_subscriber_id, Subscriber};
pub use workflow::{resolve_workflow, FALLBACK_WORKFLOW};

/// Configurable constants used while mapping.
#[derive(Debug, Clone)]
pub struct MappingOptions {
    /// Email placed on every subscriber
    pub subscriber_email: String,
    /// Branding logo placed on every payload
    pub app_logo_url: String,
    /// Base URL for invitation accept links
    pub after_sign_in_url: String,
}

impl MappingOptions {
    /// Options with the default subscriber email and logo.
    pub fn new(after_sign_in_url: impl Into<String>) -> Self {
        Self {
            subscriber_email: DEFAULT_SUBSCRIBER_EMAIL.to_string(),
            app_logo_url: DEFAULT_APP_LOGO_URL.to_string(),
            after_sign_in_url: after_sign_in_url.into(),
        }
    }
}

impl From<&Config> for MappingOptions {
    fn from(config: &Config) -> Self {
        Self {
            subscriber_email: config.subscriber_email.clone(),
            app_logo_url: config.app_logo_url.clone(),
            after_sign_in_url: config.after_sign_in_url.clone(),
        }
    }
}

/// Result of mapping a Clerk event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MappedEvent {
    pub workflow_id: &'static str,
    pub subscriber: Subscriber,
    pub payload: Map<String, Value>,
}

/// Map a Clerk event onto a Novu workflow, subscriber and payload.
pub fn map_event(event_type: &str, data: &Value, options: &MappingOptions) -> MappedEvent {
    let workflow_id = resolve_workflow(event_type);
    let subscriber_id = derive_subscriber_id(data);
    let context = EventContext::extract(data);

    info!(
        event_type = %event_type,
        workflow_id = workflow_id,
        subscriber_id = %subscriber_id,
        context = ?context,
        "clerk_event_mapping"
    );

    let subscriber = build_subscriber(subscriber_id, &options.subscriber_email, data);
    let payload = build_payload(event_type, data, &context, options);

    MappedEvent {
        workflow_id,
        subscriber,
        payload,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn options() -> MappingOptions {
        MappingOptions::new("https://app.example.com")
    }

    #[test]
    fn test_unknown_event_uses_fallback_workflow() {
        for event_type in ["email.created", "sms.created", "organization.exploded"] {
            let mapped = map_event(event_type, &json!({ "id": "x" }), &options());
            assert_eq!(mapped.workflow_id, FALLBACK_WORKFLOW);
            assert_eq!(mapped.payload.len(), 1);
        }
    }

    #[test]
    fn test_id_wins_over_user_id() {
        let data = json!({ "id": "orgmem_1", "user_id": "user_1" });
        let mapped = map_event("organizationMembership.created", &data, &options());

        assert_eq!(mapped.subscriber.subscriber_id, "clerk_user_orgmem_1");
    }

    #[test]
    fn test_subscriber_uses_email_override() {
        let mapped = map_event("user.created", &json!({ "id": "user_1" }), &options());
        assert_eq!(mapped.subscriber.email, DEFAULT_SUBSCRIBER_EMAIL);

        let custom = MappingOptions {
            subscriber_email: "ops@example.com".to_string(),
            ..options()
        };
        let mapped = map_event("user.created", &json!({ "id": "user_1" }), &custom);
        assert_eq!(mapped.subscriber.email, "ops@example.com");
    }

    #[test]
    fn test_invitation_created() {
        let data = json!({
            "id": "orginv_123",
            "email_address": "new@acme.io",
            "organization": { "name": "Acme" },
            "inviter": { "email_addresses": [{ "email_address": "boss+ops@acme.io" }] }
        });

        let mapped = map_event("organizationInvitation.created", &data, &options());

        assert_eq!(mapped.workflow_id, "org-invite-created");
        assert_eq!(mapped.payload["inviter_name"], json!("boss+ops@acme.io"));
        assert_eq!(
            mapped.payload["escapeURIs_inviter_name"],
            json!("boss%2Bops%40acme.io")
        );
        assert_eq!(
            mapped.payload["action_url"],
            json!("https://app.example.com/accept-invite?token=orginv_123")
        );
        assert_eq!(mapped.payload["app"], json!({ "name": "Acme" }));
    }

    #[test]
    fn test_waitlist_preserves_app_name() {
        let data = json!({
            "id": "wle_1",
            "organization": { "name": "Acme" },
            "domain": { "name": "acme.io" }
        });

        let mapped = map_event("waitlistEntry.created", &data, &options());

        assert_eq!(mapped.workflow_id, "waitlist-created");
        assert_eq!(
            mapped.payload["app"],
            json!({ "name": "Acme", "domain_name": "acme.io", "url": "https://acme.io" })
        );
    }

    #[test]
    fn test_session_created() {
        let data = json!({
            "id": "sess_1",
            "user_id": "user_1",
            "requested_from": "Chrome on macOS",
            "user": { "public_metadata": { "locale": "en" } }
        });

        let mapped = map_event("session.created", &data, &options());

        assert_eq!(mapped.workflow_id, "session-created");
        assert_eq!(mapped.subscriber.subscriber_id, "clerk_user_sess_1");
        assert_eq!(mapped.payload["requested_from"], json!("Chrome on macOS"));
        assert_eq!(mapped.payload["user"]["public_metadata"], json!({ "locale": "en" }));
    }

    #[test]
    fn test_missing_organization_object_does_not_fail() {
        let data = json!({ "organization": null, "role": "org:admin" });

        let mapped = map_event("organizationMembership.updated", &data, &options());

        assert_eq!(mapped.subscriber.subscriber_id, "default");
        assert!(!mapped.payload.contains_key("app"));
        assert_eq!(
            mapped.subscriber.data.unwrap()["clerk_organization_role"],
            json!("org:admin")
        );
    }

    #[test]
    fn test_map_event_is_idempotent() {
        let data = json!({
            "id": "orginv_9",
            "created_at": 1700000000000u64,
            "public_metadata": { "a": 1 },
            "organization": { "name": "Acme" },
            "inviter": { "email_addresses": [{ "email_address": "x@y.z" }] }
        });

        let first = map_event("organizationInvitation.created", &data, &options());
        let second = map_event("organizationInvitation.created", &data, &options());

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_vec(&first).unwrap(),
            serde_json::to_vec(&second).unwrap()
        );
    }
}
