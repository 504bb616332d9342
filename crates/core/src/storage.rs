//! Storage trait for webhook persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::WebhookResult;
use crate::types::{Alert, EventStatus, NotificationLog, WebhookEvent, WebhookSource};

/// Trait for webhook storage backends.
///
/// The core treats the store as opaque: `create_event` must be atomic
/// and return the stored record; read operations exclude soft-deleted
/// rows. Backend failures surface as `WebhookError::StorageFailure`.
#[async_trait]
pub trait WebhookStorage: Send + Sync {
    // ==================== Source Operations ====================

    /// Saves a webhook source, replacing any existing record with the
    /// same slug.
    async fn save_source(&self, source: &WebhookSource) -> WebhookResult<()>;

    /// Gets a source by slug.
    async fn get_source_by_slug(&self, slug: &str) -> WebhookResult<Option<WebhookSource>>;

    /// Lists all sources.
    async fn list_sources(&self) -> WebhookResult<Vec<WebhookSource>>;

    /// Soft-deletes a source.
    async fn delete_source(&self, slug: &str) -> WebhookResult<()>;

    // ==================== Event Operations ====================

    /// Persists a new event and returns the stored record.
    async fn create_event(&self, event: &WebhookEvent) -> WebhookResult<WebhookEvent>;

    /// Gets an event by ID.
    async fn get_event(&self, id: &str) -> WebhookResult<Option<WebhookEvent>>;

    /// Lists recent events for a source, newest first.
    async fn list_events_for_source(
        &self,
        source_id: &str,
        limit: usize,
    ) -> WebhookResult<Vec<WebhookEvent>>;

    /// Updates an event's lifecycle status.
    async fn update_event_status(
        &self,
        id: &str,
        status: EventStatus,
        processed_at: Option<DateTime<Utc>>,
    ) -> WebhookResult<()>;

    /// Soft-deletes an event.
    async fn delete_event(&self, id: &str) -> WebhookResult<()>;

    // ==================== Alert Operations ====================

    /// Saves an alert.
    async fn save_alert(&self, alert: &Alert) -> WebhookResult<()>;

    /// Gets an alert by ID.
    async fn get_alert(&self, id: &str) -> WebhookResult<Option<Alert>>;

    /// Lists alerts generated from an event.
    async fn list_alerts_for_event(&self, event_id: &str) -> WebhookResult<Vec<Alert>>;

    // ==================== Notification Log Operations ====================

    /// Saves a notification delivery record.
    async fn save_notification_log(&self, log: &NotificationLog) -> WebhookResult<()>;

    /// Lists delivery attempts for an alert.
    async fn list_logs_for_alert(&self, alert_id: &str) -> WebhookResult<Vec<NotificationLog>>;
}
