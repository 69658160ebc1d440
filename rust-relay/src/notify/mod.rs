//! Notification delivery module.
//!
//! This module provides:
//! - The `Notifier` trait the webhook handler triggers through
//! - `NovuClient`, the Novu HTTP API implementation

pub mod novu;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::mapping::Subscriber;

pub use novu::{NovuClient, TriggerRequest};

/// A failed trigger call.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{message}")]
    Rejected { status: StatusCode, message: String },
}

/// Something that can trigger a notification workflow.
///
/// One attempt per call; retries belong to the delivery service.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn trigger(
        &self,
        workflow_id: &str,
        to: &Subscriber,
        payload: &Map<String, Value>,
    ) -> Result<(), NotifyError>;
}
