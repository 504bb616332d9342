//! Default webhook source seeding.

use hookwatch_core::{WebhookResult, WebhookSource, WebhookStorage};
use rand::Rng;

/// Alphanumeric charset without ambiguous characters.
const SECRET_CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZabcdefghjkmnpqrstuvwxyz23456789";

/// Generates a random shared secret.
pub fn generate_secret(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..SECRET_CHARSET.len());
            SECRET_CHARSET[idx] as char
        })
        .collect()
}

/// Seeds the default webhook sources, skipping any that already exist.
///
/// Shopify ships disabled: it has no verification scheme defined, so
/// deliveries to it are rejected either way.
pub async fn seed_default_sources(storage: &dyn WebhookStorage) -> WebhookResult<()> {
    let defaults = [
        ("GitHub", "github", true),
        ("GitLab", "gitlab", true),
        ("Stripe", "stripe", true),
        ("Custom Webhook", "custom", true),
        ("Shopify", "shopify", false),
    ];

    for (name, slug, active) in defaults {
        if storage.get_source_by_slug(slug).await?.is_some() {
            continue;
        }

        let mut source = WebhookSource::new(slug, name, generate_secret(32));
        source.active = active;
        storage.save_source(&source).await?;

        tracing::info!(slug = %slug, active = active, "Seeded webhook source");
    }

    for source in storage.list_sources().await? {
        if source.active {
            tracing::info!("Webhook endpoint ready: POST /api/webhooks/{}", source.slug);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hookwatch_adapter_memory::MemoryStorage;

    #[test]
    fn test_generate_secret_length_and_charset() {
        let secret = generate_secret(32);
        assert_eq!(secret.len(), 32);
        assert!(secret.bytes().all(|b| SECRET_CHARSET.contains(&b)));
    }

    #[tokio::test]
    async fn test_seeding_is_idempotent() {
        let storage = MemoryStorage::new();

        seed_default_sources(&storage).await.unwrap();
        let first = storage.get_source_by_slug("github").await.unwrap().unwrap();

        seed_default_sources(&storage).await.unwrap();
        let second = storage.get_source_by_slug("github").await.unwrap().unwrap();

        assert_eq!(first.secret, second.secret);
        assert_eq!(storage.list_sources().await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_shopify_seeds_disabled() {
        let storage = MemoryStorage::new();
        seed_default_sources(&storage).await.unwrap();

        let shopify = storage.get_source_by_slug("shopify").await.unwrap().unwrap();
        assert!(!shopify.active);
    }
}
