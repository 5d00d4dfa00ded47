mod cache_store;

pub use self::cache_store::CacheStore;

use crate::abstract_trait::CacheStoreTrait;
use chrono::Duration;
use serde::{Serialize, de::DeserializeOwned};
use tracing::error;

pub async fn get_json<T>(cache: &(dyn CacheStoreTrait + Send + Sync), key: &str) -> Option<T>
where
    T: DeserializeOwned,
{
    let data = cache.get_from_cache(key).await?;

    match serde_json::from_str::<T>(&data) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            error!(
                "Failed to deserialize cached value for key '{}': {:?}",
                key, e
            );
            None
        }
    }
}

pub async fn set_json<T>(
    cache: &(dyn CacheStoreTrait + Send + Sync),
    key: &str,
    data: &T,
    expiration: Duration,
) where
    T: Serialize,
{
    match serde_json::to_string(data) {
        Ok(json) => cache.set_to_cache(key, json, expiration).await,
        Err(e) => error!("Failed to serialize data for key '{}': {:?}", key, e),
    }
}
