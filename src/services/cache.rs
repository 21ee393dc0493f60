use crate::models::Product;
use std::sync::Arc;
use std::time::Duration;

/// Bounded in-process cache for the full-catalog snapshot
///
/// Product listing and search share one cached snapshot so concurrent
/// requests don't each re-read the whole catalog. Every catalog write
/// invalidates it; entries also expire on a TTL. The search pipeline itself
/// never caches prompts, completions, or results.
pub struct CatalogCache {
    snapshots: moka::future::Cache<String, Arc<Vec<Product>>>,
}

impl CatalogCache {
    /// Create a new catalog cache
    pub fn new(capacity: u64, ttl_secs: u64) -> Self {
        let snapshots = moka::future::CacheBuilder::new(capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { snapshots }
    }

    /// Get the cached catalog snapshot, if present
    pub async fn get_snapshot(&self) -> Option<Arc<Vec<Product>>> {
        let snapshot = self.snapshots.get(&CacheKey::snapshot()).await;

        match &snapshot {
            Some(products) => tracing::trace!("Snapshot cache hit ({} products)", products.len()),
            None => tracing::trace!("Snapshot cache miss"),
        }

        snapshot
    }

    /// Store the catalog snapshot
    pub async fn set_snapshot(&self, products: Arc<Vec<Product>>) {
        self.snapshots.insert(CacheKey::snapshot(), products).await;
        tracing::trace!("Snapshot cache set");
    }

    /// Drop the cached snapshot after a catalog write
    pub async fn invalidate(&self) {
        self.snapshots.invalidate(&CacheKey::snapshot()).await;
        tracing::trace!("Snapshot cache invalidated");
    }
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Key for the full-catalog snapshot
    pub fn snapshot() -> String {
        "catalog:snapshot".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_products() -> Arc<Vec<Product>> {
        Arc::new(vec![Product {
            id: 1,
            name: "Laptop A".to_string(),
            description: "Budget laptop".to_string(),
            price: 999.0,
            image_url: None,
            category_id: 1,
            attributes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            category: None,
        }])
    }

    #[tokio::test]
    async fn test_cache_set_get_invalidate() {
        let cache = CatalogCache::new(16, 60);

        assert!(cache.get_snapshot().await.is_none());

        cache.set_snapshot(sample_products()).await;
        let cached = cache.get_snapshot().await.expect("snapshot should be cached");
        assert_eq!(cached.len(), 1);

        cache.invalidate().await;
        assert!(cache.get_snapshot().await.is_none());
    }

    #[test]
    fn test_cache_key_builder() {
        assert_eq!(CacheKey::snapshot(), "catalog:snapshot");
    }
}
