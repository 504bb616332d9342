//! Hookwatch server binary.

use std::sync::Arc;

use hookwatch_adapter_memory::MemoryStorage;
use hookwatch_server::{load_config, ServerConfig, WebhookServer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let config = match std::env::args().nth(1) {
        Some(path) => load_config(&path)?,
        None => ServerConfig::default(),
    };

    // Create and run server
    let storage = Arc::new(MemoryStorage::new());
    let server = WebhookServer::new(config, storage);
    server.run().await?;

    Ok(())
}
