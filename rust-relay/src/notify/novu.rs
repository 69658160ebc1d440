//! Novu HTTP API client.
//!
//! Triggers are sent to `POST {api_url}/v1/events/trigger` with an
//! `ApiKey` authorization header. The response body is only inspected for an
//! error message.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};
use url::Url;

use super::{Notifier, NotifyError};
use crate::mapping::Subscriber;

const TRIGGER_PATH: &str = "v1/events/trigger";

/// Body of a Novu trigger request.
#[derive(Debug, Serialize)]
pub struct TriggerRequest<'a> {
    /// Workflow identifier
    pub name: &'a str,
    pub to: &'a Subscriber,
    pub payload: &'a Map<String, Value>,
}

/// Novu client sharing one HTTP connection pool across requests.
#[derive(Clone)]
pub struct NovuClient {
    inner: Arc<NovuClientInner>,
}

struct NovuClientInner {
    client: Client,
    trigger_url: Url,
    api_key: String,
}

impl NovuClient {
    /// Create a client for the Novu API at `api_url`.
    pub fn new(api_url: &Url, api_key: String, timeout: Duration) -> Result<Self> {
        let trigger_url = trigger_url(api_url)?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            inner: Arc::new(NovuClientInner {
                client,
                trigger_url,
                api_key,
            }),
        })
    }

    /// Full URL triggers are posted to.
    pub fn trigger_url(&self) -> &Url {
        &self.inner.trigger_url
    }
}

#[async_trait]
impl Notifier for NovuClient {
    async fn trigger(
        &self,
        workflow_id: &str,
        to: &Subscriber,
        payload: &Map<String, Value>,
    ) -> Result<(), NotifyError> {
        let body = TriggerRequest {
            name: workflow_id,
            to,
            payload,
        };

        debug!(
            workflow_id = workflow_id,
            body = %serde_json::to_string(&body).unwrap_or_default(),
            "novu_trigger_body"
        );

        let response = self
            .inner
            .client
            .post(self.inner.trigger_url.clone())
            .header(header::AUTHORIZATION, format!("ApiKey {}", self.inner.api_key))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            info!(
                workflow_id = workflow_id,
                subscriber_id = %to.subscriber_id,
                status = status.as_u16(),
                "novu_trigger_sent"
            );
            return Ok(());
        }

        let text = response.text().await.unwrap_or_default();
        let message = error_message(status, &text);

        warn!(
            workflow_id = workflow_id,
            subscriber_id = %to.subscriber_id,
            status = status.as_u16(),
            error = %message,
            "novu_trigger_rejected"
        );

        Err(NotifyError::Rejected { status, message })
    }
}

/// Resolve the trigger endpoint relative to the API base URL.
fn trigger_url(api_url: &Url) -> Result<Url> {
    let mut base = api_url.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(TRIGGER_PATH)
        .with_context(|| format!("Invalid Novu API URL: {}", api_url))
}

/// Pull a readable message out of a Novu error response.
///
/// Novu answers with `{"statusCode":..,"message":..}` where `message` is a
/// string or, for validation errors, a list of strings.
fn error_message(status: StatusCode, body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();

    match parsed.as_ref().and_then(|v| v.get("message")) {
        Some(Value::String(message)) if !message.is_empty() => message.clone(),
        Some(Value::Array(messages)) if !messages.is_empty() => messages
            .iter()
            .map(|m| m.as_str().map(str::to_string).unwrap_or_else(|| m.to_string()))
            .collect::<Vec<_>>()
            .join(", "),
        _ => format!("Novu responded with {}", status),
    }
}
