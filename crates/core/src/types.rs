//! Core data types for Hookwatch.
//!
//! This module defines the webhook source and event records plus the
//! downstream alert/notification entities that consume them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Lifecycle status of a stored webhook event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    /// Accepted and waiting for downstream processing.
    Pending,
    /// Currently being processed.
    Processing,
    /// Processing finished successfully.
    Processed,
    /// Processing failed.
    Failed,
}

/// Severity of an alert generated from a webhook event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

/// Outcome of one notification delivery attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationStatus {
    Sent,
    Failed,
}

/// A registered webhook origin.
///
/// The slug is the stable identifier: it is the routing key for inbound
/// deliveries and immutable once created. Sources are soft-deleted so
/// their events remain auditable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookSource {
    /// Unique identifier.
    pub id: String,
    /// Stable lookup and routing key.
    pub slug: String,
    /// Display name.
    pub name: String,
    /// Shared secret used for signature verification. Never logged.
    pub secret: String,
    /// Whether this source accepts deliveries.
    pub active: bool,
    /// Timestamp when the source was created.
    pub created_at: DateTime<Utc>,
    /// Timestamp when the source was last updated.
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl WebhookSource {
    /// Creates a new active source.
    pub fn new(slug: impl Into<String>, name: impl Into<String>, secret: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            slug: slug.into(),
            name: name.into(),
            secret: secret.into(),
            active: true,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// Marks the source inactive.
    pub fn disabled(mut self) -> Self {
        self.active = false;
        self
    }

    /// Logically removes the source, retaining it for audit.
    pub fn soft_delete(&mut self) {
        let now = Utc::now();
        self.deleted_at = Some(now);
        self.updated_at = now;
    }

    /// Returns true if the source has been soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// One verified, accepted webhook delivery.
///
/// Events are only ever created for requests that passed signature
/// verification; rejected requests leave no record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEvent {
    /// Unique identifier.
    pub id: String,
    /// The source this delivery belongs to.
    pub source_id: String,
    /// Provider-reported event type, `"unknown"` when absent.
    pub event_type: String,
    /// Payload parsed from the raw request body, stored verbatim.
    pub payload: Value,
    /// Request headers as received.
    pub headers: HashMap<String, String>,
    /// The signature value as received.
    pub signature: String,
    /// Client IP address.
    pub ip_address: String,
    /// Lifecycle status, mutated by downstream processing.
    pub status: EventStatus,
    /// Set when processing reaches a terminal state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed_at: Option<DateTime<Utc>>,
    /// Timestamp when the event was created.
    pub created_at: DateTime<Utc>,
    /// Timestamp when the event was last updated.
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl WebhookEvent {
    /// Creates a new pending event for an accepted delivery.
    pub fn pending(
        source_id: impl Into<String>,
        event_type: impl Into<String>,
        payload: Value,
        headers: HashMap<String, String>,
        signature: impl Into<String>,
        ip_address: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            source_id: source_id.into(),
            event_type: event_type.into(),
            payload,
            headers,
            signature: signature.into(),
            ip_address: ip_address.into(),
            status: EventStatus::Pending,
            processed_at: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// Marks the event as being processed.
    pub fn mark_processing(&mut self) {
        self.status = EventStatus::Processing;
        self.updated_at = Utc::now();
    }

    /// Marks the event as successfully processed.
    pub fn mark_processed(&mut self) {
        let now = Utc::now();
        self.status = EventStatus::Processed;
        self.processed_at = Some(now);
        self.updated_at = now;
    }

    /// Marks the event as failed.
    pub fn mark_failed(&mut self) {
        let now = Utc::now();
        self.status = EventStatus::Failed;
        self.processed_at = Some(now);
        self.updated_at = now;
    }

    /// Logically removes the event, retaining it for audit.
    pub fn soft_delete(&mut self) {
        let now = Utc::now();
        self.deleted_at = Some(now);
        self.updated_at = now;
    }

    /// Returns true if the event has been soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// An alert generated from a webhook event by downstream processing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    /// Unique identifier.
    pub id: String,
    /// The event this alert was generated from.
    pub event_id: String,
    /// Short title.
    pub title: String,
    /// Alert body.
    pub message: String,
    /// Severity level.
    pub severity: AlertSeverity,
    /// Optional structured context.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    /// Whether an operator has acknowledged the alert.
    pub is_read: bool,
    /// Timestamp when the alert was created.
    pub created_at: DateTime<Utc>,
    /// Timestamp when the alert was last updated.
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Alert {
    /// Creates a new unread alert.
    pub fn new(
        event_id: impl Into<String>,
        title: impl Into<String>,
        message: impl Into<String>,
        severity: AlertSeverity,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            event_id: event_id.into(),
            title: title.into(),
            message: message.into(),
            severity,
            metadata: None,
            is_read: false,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// Attaches structured context.
    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Marks the alert as acknowledged.
    pub fn mark_read(&mut self) {
        self.is_read = true;
        self.updated_at = Utc::now();
    }
}

/// A record of one notification delivery attempt for an alert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationLog {
    /// Unique identifier.
    pub id: String,
    /// The alert this attempt belongs to.
    pub alert_id: String,
    /// Delivery channel (e.g. "email", "slack").
    pub channel: String,
    /// Channel-specific recipient.
    pub recipient: String,
    /// Attempt outcome.
    pub status: NotificationStatus,
    /// Error detail for failed attempts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Timestamp when the attempt was recorded.
    pub created_at: DateTime<Utc>,
    /// Timestamp when the record was last updated.
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl NotificationLog {
    /// Records a successful delivery attempt.
    pub fn sent(
        alert_id: impl Into<String>,
        channel: impl Into<String>,
        recipient: impl Into<String>,
    ) -> Self {
        Self::record(alert_id, channel, recipient, NotificationStatus::Sent, None)
    }

    /// Records a failed delivery attempt.
    pub fn failed(
        alert_id: impl Into<String>,
        channel: impl Into<String>,
        recipient: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self::record(
            alert_id,
            channel,
            recipient,
            NotificationStatus::Failed,
            Some(error.into()),
        )
    }

    fn record(
        alert_id: impl Into<String>,
        channel: impl Into<String>,
        recipient: impl Into<String>,
        status: NotificationStatus,
        error_message: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            alert_id: alert_id.into(),
            channel: channel.into(),
            recipient: recipient.into(),
            status,
            error_message,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_source_is_active() {
        let source = WebhookSource::new("github", "GitHub", "secret");
        assert!(source.active);
        assert!(!source.is_deleted());

        let disabled = WebhookSource::new("shopify", "Shopify", "secret").disabled();
        assert!(!disabled.active);
    }

    #[test]
    fn test_event_lifecycle() {
        let mut event = WebhookEvent::pending(
            "src-1",
            "push",
            json!({"ref": "main"}),
            HashMap::new(),
            "sha256=abc",
            "127.0.0.1",
        );
        assert_eq!(event.status, EventStatus::Pending);
        assert!(event.processed_at.is_none());

        event.mark_processing();
        assert_eq!(event.status, EventStatus::Processing);
        assert!(event.processed_at.is_none());

        event.mark_processed();
        assert_eq!(event.status, EventStatus::Processed);
        assert!(event.processed_at.is_some());
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&EventStatus::Pending).unwrap(),
            "\"pending\""
        );
        assert_eq!(
            serde_json::to_string(&AlertSeverity::Critical).unwrap(),
            "\"critical\""
        );
        assert_eq!(
            serde_json::to_string(&NotificationStatus::Sent).unwrap(),
            "\"sent\""
        );
    }

    #[test]
    fn test_soft_delete() {
        let mut source = WebhookSource::new("github", "GitHub", "secret");
        source.soft_delete();
        assert!(source.is_deleted());
    }

    #[test]
    fn test_notification_log_records() {
        let sent = NotificationLog::sent("alert-1", "email", "ops@example.com");
        assert_eq!(sent.status, NotificationStatus::Sent);
        assert!(sent.error_message.is_none());

        let failed = NotificationLog::failed("alert-1", "slack", "#ops", "channel archived");
        assert_eq!(failed.status, NotificationStatus::Failed);
        assert_eq!(failed.error_message.as_deref(), Some("channel archived"));
    }
}
