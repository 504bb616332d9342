//! # Hookwatch Server
//!
//! Webhook intake server exposing `POST /api/webhooks/{slug}` and
//! mapping intake outcomes to HTTP responses.

mod config;
mod routes;
mod seed;

pub use config::{load_config, ConfigError, ServerConfig};
pub use routes::{webhook_routes, AppState};
pub use seed::{generate_secret, seed_default_sources};

use std::net::SocketAddr;
use std::sync::Arc;

use hookwatch_core::{EventIngestor, SignatureVerifier, WebhookStorage};

/// The webhook intake server.
pub struct WebhookServer {
    /// Server configuration.
    pub config: ServerConfig,
    storage: Arc<dyn WebhookStorage>,
}

impl WebhookServer {
    /// Creates a new server over a storage backend.
    pub fn new(config: ServerConfig, storage: Arc<dyn WebhookStorage>) -> Self {
        Self { config, storage }
    }

    /// Builds the ingestor configured for this server.
    fn ingestor(&self) -> EventIngestor {
        let mut verifier = SignatureVerifier::new();
        if let Some(secs) = self.config.stripe_tolerance_secs {
            verifier = verifier.with_stripe_tolerance(secs);
        }
        EventIngestor::new(self.storage.clone()).with_verifier(verifier)
    }

    /// Starts the server.
    pub async fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        if self.config.seed_sources {
            seed::seed_default_sources(self.storage.as_ref()).await?;
        }

        let state = AppState {
            storage: self.storage.clone(),
            ingestor: Arc::new(self.ingestor()),
        };
        let app = webhook_routes(state);

        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port).parse()?;
        tracing::info!("Starting Hookwatch server on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await?;

        Ok(())
    }
}
