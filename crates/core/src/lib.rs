//! # Hookwatch Core
//!
//! Core webhook intake for Hookwatch providing:
//! - Per-provider signature verification (GitHub, GitLab, Stripe, custom)
//! - Constant-time signature comparison
//! - Event-type extraction and normalized event records
//! - A pluggable storage seam
//!
//! ## Example
//!
//! ```rust,ignore
//! use hookwatch_core::{EventIngestor, InboundDelivery};
//!
//! let ingestor = EventIngestor::new(storage);
//! let receipt = ingestor.ingest(&source, &delivery).await?;
//! println!("accepted event {}", receipt.event_id);
//! ```

mod error;
mod ingest;
mod provider;
mod signature;
mod storage;
mod types;

pub use error::{WebhookError, WebhookResult};
pub use ingest::{EventIngestor, InboundDelivery, IngestReceipt};
pub use provider::{Provider, DEFAULT_EVENT_TYPE};
pub use signature::{sign, sign_stripe_at, SignatureVerifier};
pub use storage::WebhookStorage;
pub use types::{
    Alert, AlertSeverity, EventStatus, NotificationLog, NotificationStatus, WebhookEvent,
    WebhookSource,
};
