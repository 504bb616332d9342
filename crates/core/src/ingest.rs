//! Event intake - the single entry point per inbound delivery.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::error::{WebhookError, WebhookResult};
use crate::provider::{header_value, Provider};
use crate::signature::SignatureVerifier;
use crate::storage::WebhookStorage;
use crate::types::{WebhookEvent, WebhookSource};

/// One inbound HTTP delivery as seen by the core.
///
/// `body` holds the exact raw bytes of the request; signature
/// verification runs over these bytes, never a re-serialization.
#[derive(Debug, Clone)]
pub struct InboundDelivery {
    /// Raw request body bytes.
    pub body: Vec<u8>,
    /// Full request header map.
    pub headers: HashMap<String, String>,
    /// Client IP address.
    pub ip_address: String,
}

/// Receipt returned for an accepted delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestReceipt {
    /// ID of the newly stored event.
    pub event_id: String,
    /// Event type recorded on the event.
    pub event_type: String,
}

/// Orchestrates one inbound delivery: verifies it, extracts the event
/// type, and persists the normalized event record.
pub struct EventIngestor {
    storage: Arc<dyn WebhookStorage>,
    verifier: SignatureVerifier,
}

impl EventIngestor {
    /// Creates an ingestor with the default verifier.
    pub fn new(storage: Arc<dyn WebhookStorage>) -> Self {
        Self {
            storage,
            verifier: SignatureVerifier::new(),
        }
    }

    /// Replaces the verifier (e.g. to enable the Stripe tolerance).
    pub fn with_verifier(mut self, verifier: SignatureVerifier) -> Self {
        self.verifier = verifier;
        self
    }

    /// Processes one delivery for a source.
    ///
    /// Each call is an independent, stateless unit of work; the only
    /// shared state is the storage backend. Every rejection is logged at
    /// warn level with the source slug and client IP only, acceptances
    /// at info level with the event id and type. Payloads and secrets
    /// never reach the logs.
    pub async fn ingest(
        &self,
        source: &WebhookSource,
        delivery: &InboundDelivery,
    ) -> WebhookResult<IngestReceipt> {
        match self.process(source, delivery).await {
            Ok(receipt) => {
                tracing::info!(
                    source = %source.slug,
                    event_id = %receipt.event_id,
                    event_type = %receipt.event_type,
                    "Webhook received"
                );
                Ok(receipt)
            }
            Err(err) => {
                tracing::warn!(
                    source = %source.slug,
                    ip = %delivery.ip_address,
                    error = %err,
                    "Webhook rejected"
                );
                Err(err)
            }
        }
    }

    async fn process(
        &self,
        source: &WebhookSource,
        delivery: &InboundDelivery,
    ) -> WebhookResult<IngestReceipt> {
        if !source.active {
            return Err(WebhookError::SourceDisabled {
                slug: source.slug.clone(),
            });
        }

        if delivery.body.is_empty() {
            return Err(WebhookError::MissingPayload);
        }

        // Malformed payloads are rejected before any verification work.
        let payload: Value = serde_json::from_slice(&delivery.body)?;

        let provider = Provider::from_slug(&source.slug)?;

        let header = provider.signature_header();
        let Some(signature) = header_value(&delivery.headers, header) else {
            return Err(WebhookError::MissingSignatureHeader {
                header: header.to_string(),
            });
        };

        // Verification runs over the raw body bytes, not the parsed value.
        if !self
            .verifier
            .verify(provider, &delivery.body, signature, &source.secret)
        {
            return Err(WebhookError::SignatureMismatch);
        }

        let event_type = provider.extract_event_type(&delivery.headers, &payload);

        let event = WebhookEvent::pending(
            &source.id,
            &event_type,
            payload,
            delivery.headers.clone(),
            signature,
            &delivery.ip_address,
        );
        let stored = self.storage.create_event(&event).await?;

        Ok(IngestReceipt {
            event_id: stored.id,
            event_type: stored.event_type,
        })
    }
}

impl InboundDelivery {
    /// Builds a delivery from raw parts.
    pub fn new(
        body: impl Into<Vec<u8>>,
        headers: HashMap<String, String>,
        ip_address: impl Into<String>,
    ) -> Self {
        Self {
            body: body.into(),
            headers,
            ip_address: ip_address.into(),
        }
    }
}
