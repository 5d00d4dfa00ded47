use async_trait::async_trait;
use chrono::Duration;
use std::sync::Arc;

pub type DynCacheStore = Arc<dyn CacheStoreTrait + Send + Sync>;

/// Raw string cache. Callers own (de)serialization, see [`crate::cache::get_json`].
#[async_trait]
pub trait CacheStoreTrait {
    async fn get_from_cache(&self, key: &str) -> Option<String>;

    async fn set_to_cache(&self, key: &str, value: String, expiration: Duration);

    async fn delete_from_cache(&self, key: &str);

    /// Removes every key starting with `prefix`.
    async fn delete_by_prefix(&self, prefix: &str);
}
