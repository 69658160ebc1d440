//! Webhook endpoint handlers.
//!
//! The Clerk handler runs each request straight through:
//! 1. Check the Svix headers
//! 2. Verify the signature and parse the event
//! 3. Map the event to a Novu workflow
//! 4. Trigger Novu and report the outcome

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::mapping::{map_event, MappingOptions};
use crate::notify::Notifier;
use crate::web::error::WebhookError;
use crate::web::signature::{SvixHeaders, SvixVerifier};
use crate::Config;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub verifier: Arc<SvixVerifier>,
    pub notifier: Arc<dyn Notifier>,
    pub mapping: Arc<MappingOptions>,
}

impl AppState {
    pub fn new(config: Config, verifier: SvixVerifier, notifier: Arc<dyn Notifier>) -> Self {
        let mapping = MappingOptions::from(&config);
        Self {
            config: Arc::new(config),
            verifier: Arc::new(verifier),
            notifier,
            mapping: Arc::new(mapping),
        }
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// =============================================================================
// Clerk Webhook
// =============================================================================

/// Webhook response body.
///
/// A failed Novu trigger is still answered with HTTP 200; the failure is
/// reported through `status: 500` in the body.
#[derive(Debug, Serialize, Deserialize)]
pub struct WebhookResponse {
    pub status: u16,
    pub message: String,
    #[serde(rename = "eventId", default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<Value>,
}

/// Clerk webhook endpoint.
///
/// Verification happens over the raw request body, before any JSON parsing.
pub async fn clerk_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookResponse>, WebhookError> {
    let Some(svix) = SvixHeaders::from_headers(&headers) else {
        warn!(body_length = body.len(), "clerk_webhook_missing_svix_headers");
        return Err(WebhookError::MissingHeaders);
    };

    info!(
        msg_id = %svix.id,
        body_length = body.len(),
        "clerk_webhook_received"
    );

    let event = state.verifier.verify(&svix, &body).map_err(|e| {
        error!(msg_id = %svix.id, error = %e, "clerk_signature_invalid");
        WebhookError::from(e)
    })?;

    let mapped = map_event(&event.event_type, &event.data, &state.mapping);

    if let Err(e) = state
        .notifier
        .trigger(mapped.workflow_id, &mapped.subscriber, &mapped.payload)
        .await
    {
        let payload = Value::Object(mapped.payload.clone());
        error!(
            msg_id = %svix.id,
            event_type = %event.event_type,
            workflow_id = mapped.workflow_id,
            subscriber_id = %mapped.subscriber.subscriber_id,
            payload = %payload,
            error = %e,
            "clerk_event_trigger_failed"
        );
        return Ok(Json(WebhookResponse {
            status: 500,
            message: e.to_string(),
            event_id: None,
        }));
    }

    info!(
        msg_id = %svix.id,
        event_type = %event.event_type,
        workflow_id = mapped.workflow_id,
        "clerk_event_processed"
    );

    Ok(Json(WebhookResponse {
        status: 200,
        message: format!("Successfully processed {} event", event.event_type),
        event_id: event.data_id().cloned(),
    }))
}
