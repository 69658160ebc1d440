//! Request rejections for the webhook endpoint.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use super::signature::SignatureError;

/// Reasons a webhook is rejected before any mapping happens.
///
/// Both answer `400` with a plain text body.
#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("Error occured -- no svix headers")]
    MissingHeaders,

    #[error("Error occured")]
    InvalidSignature(#[from] SignatureError),
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, self.to_string()).into_response()
    }
}
