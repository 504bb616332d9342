//! # Hookwatch Memory Adapter
//!
//! An in-memory storage adapter for Hookwatch, primarily intended
//! for testing and development purposes.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use hookwatch_adapter_memory::MemoryStorage;
//!
//! let storage = Arc::new(MemoryStorage::new());
//! let ingestor = EventIngestor::new(storage);
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hookwatch_core::{
    Alert, EventStatus, NotificationLog, WebhookError, WebhookEvent, WebhookResult, WebhookSource,
    WebhookStorage,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory storage for a single entity type.
type Store<T> = Arc<RwLock<HashMap<String, T>>>;

/// In-memory storage adapter for Hookwatch.
///
/// Stores all data in memory; data is lost when the process exits.
/// Soft-deleted rows are retained but excluded from reads.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    sources: Store<WebhookSource>,
    events: Store<WebhookEvent>,
    alerts: Store<Alert>,
    notification_logs: Store<NotificationLog>,
}

impl MemoryStorage {
    /// Creates a new in-memory adapter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears all stored data.
    pub async fn clear(&self) {
        self.sources.write().await.clear();
        self.events.write().await.clear();
        self.alerts.write().await.clear();
        self.notification_logs.write().await.clear();
    }

    /// Returns the number of events stored, soft-deleted included.
    pub async fn event_count(&self) -> usize {
        self.events.read().await.len()
    }

    /// Returns the number of sources stored, soft-deleted included.
    pub async fn source_count(&self) -> usize {
        self.sources.read().await.len()
    }
}

#[async_trait]
impl WebhookStorage for MemoryStorage {
    // ==================== Source Operations ====================

    async fn save_source(&self, source: &WebhookSource) -> WebhookResult<()> {
        let mut sources = self.sources.write().await;
        sources.insert(source.slug.clone(), source.clone());
        Ok(())
    }

    async fn get_source_by_slug(&self, slug: &str) -> WebhookResult<Option<WebhookSource>> {
        let sources = self.sources.read().await;
        Ok(sources.get(slug).filter(|s| !s.is_deleted()).cloned())
    }

    async fn list_sources(&self) -> WebhookResult<Vec<WebhookSource>> {
        let sources = self.sources.read().await;
        Ok(sources
            .values()
            .filter(|s| !s.is_deleted())
            .cloned()
            .collect())
    }

    async fn delete_source(&self, slug: &str) -> WebhookResult<()> {
        let mut sources = self.sources.write().await;
        if let Some(source) = sources.get_mut(slug) {
            source.soft_delete();
        }
        Ok(())
    }

    // ==================== Event Operations ====================

    async fn create_event(&self, event: &WebhookEvent) -> WebhookResult<WebhookEvent> {
        let mut events = self.events.write().await;

        if events.contains_key(&event.id) {
            return Err(WebhookError::storage(format!(
                "event {} already exists",
                event.id
            )));
        }

        events.insert(event.id.clone(), event.clone());
        Ok(event.clone())
    }

    async fn get_event(&self, id: &str) -> WebhookResult<Option<WebhookEvent>> {
        let events = self.events.read().await;
        Ok(events.get(id).filter(|e| !e.is_deleted()).cloned())
    }

    async fn list_events_for_source(
        &self,
        source_id: &str,
        limit: usize,
    ) -> WebhookResult<Vec<WebhookEvent>> {
        let events = self.events.read().await;
        let mut matching: Vec<WebhookEvent> = events
            .values()
            .filter(|e| e.source_id == source_id && !e.is_deleted())
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matching.truncate(limit);
        Ok(matching)
    }

    async fn update_event_status(
        &self,
        id: &str,
        status: EventStatus,
        processed_at: Option<DateTime<Utc>>,
    ) -> WebhookResult<()> {
        let mut events = self.events.write().await;
        let event = events
            .get_mut(id)
            .ok_or_else(|| WebhookError::storage(format!("event {} not found", id)))?;

        event.status = status;
        event.processed_at = processed_at;
        event.updated_at = Utc::now();
        Ok(())
    }

    async fn delete_event(&self, id: &str) -> WebhookResult<()> {
        let mut events = self.events.write().await;
        if let Some(event) = events.get_mut(id) {
            event.soft_delete();
        }
        Ok(())
    }

    // ==================== Alert Operations ====================

    async fn save_alert(&self, alert: &Alert) -> WebhookResult<()> {
        let mut alerts = self.alerts.write().await;
        alerts.insert(alert.id.clone(), alert.clone());
        Ok(())
    }

    async fn get_alert(&self, id: &str) -> WebhookResult<Option<Alert>> {
        let alerts = self.alerts.read().await;
        Ok(alerts.get(id).filter(|a| a.deleted_at.is_none()).cloned())
    }

    async fn list_alerts_for_event(&self, event_id: &str) -> WebhookResult<Vec<Alert>> {
        let alerts = self.alerts.read().await;
        Ok(alerts
            .values()
            .filter(|a| a.event_id == event_id && a.deleted_at.is_none())
            .cloned()
            .collect())
    }

    // ==================== Notification Log Operations ====================

    async fn save_notification_log(&self, log: &NotificationLog) -> WebhookResult<()> {
        let mut logs = self.notification_logs.write().await;
        logs.insert(log.id.clone(), log.clone());
        Ok(())
    }

    async fn list_logs_for_alert(&self, alert_id: &str) -> WebhookResult<Vec<NotificationLog>> {
        let logs = self.notification_logs.read().await;
        Ok(logs
            .values()
            .filter(|l| l.alert_id == alert_id && l.deleted_at.is_none())
            .cloned()
            .collect())
    }
}
