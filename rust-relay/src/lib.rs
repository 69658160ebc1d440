//! Clerk → Novu relay.
//!
//! Receives Svix-signed Clerk webhooks, maps each event onto a Novu
//! notification workflow and triggers it.
//!
//! ## Architecture
//!
//! ```text
//! Clerk → POST /api/webhooks/clerk → verify → map_event → Novu trigger
//! ```

pub mod config;
pub mod event;
pub mod mapping;
pub mod notify;
pub mod web;

// Re-export commonly used types
pub use config::{Config, ConfigError};
pub use event::ClerkEvent;
pub use mapping::{map_event, MappedEvent, MappingOptions, Subscriber};
pub use notify::{Notifier, NotifyError, NovuClient};
pub use web::{router, AppState, SvixVerifier};
