//! Web server module for handling Clerk webhooks.
//!
//! This module provides the HTTP surface that:
//! - Receives Svix-signed webhooks from Clerk
//! - Verifies the signature
//! - Maps the event and triggers the matching Novu workflow

pub mod error;
pub mod handlers;
pub mod signature;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub use error::WebhookError;
pub use handlers::{clerk_webhook, health, AppState, HealthResponse, WebhookResponse};
pub use signature::{SignatureError, SvixHeaders, SvixVerifier};

/// Path Clerk posts webhooks to.
pub const CLERK_WEBHOOK_PATH: &str = "/api/webhooks/clerk";

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(CLERK_WEBHOOK_PATH, post(clerk_webhook))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
