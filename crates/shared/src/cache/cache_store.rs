use crate::abstract_trait::CacheStoreTrait;
use async_trait::async_trait;
use chrono::Duration;
use deadpool_redis::{Connection, Pool};
use std::sync::Arc;
use tracing::{debug, error, warn};

#[derive(Clone)]
pub struct CacheStore {
    redis_pool: Arc<Pool>,
}

impl CacheStore {
    pub fn new(redis_pool: Pool) -> Self {
        Self {
            redis_pool: Arc::new(redis_pool),
        }
    }

    async fn get_conn(&self) -> Option<Connection> {
        match self.redis_pool.get().await {
            Ok(conn) => Some(conn),
            Err(e) => {
                error!("Failed to get Redis pooled connection: {:?}", e);
                None
            }
        }
    }
}

#[async_trait]
impl CacheStoreTrait for CacheStore {
    async fn get_from_cache(&self, key: &str) -> Option<String> {
        let mut conn = self.get_conn().await?;

        let result: redis::RedisResult<Option<String>> =
            redis::cmd("GET").arg(key).query_async(&mut conn).await;

        match result {
            Ok(Some(data)) => Some(data),
            Ok(None) => {
                warn!("Cache miss for key: {key}");
                None
            }
            Err(e) => {
                error!("Redis get error for key '{}': {:?}", key, e);
                None
            }
        }
    }

    async fn set_to_cache(&self, key: &str, value: String, expiration: Duration) {
        let Some(mut conn) = self.get_conn().await else {
            return;
        };

        let ttl = expiration.num_seconds().max(1) as u64;

        let result: redis::RedisResult<()> = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("EX")
            .arg(ttl)
            .query_async(&mut conn)
            .await;

        match result {
            Ok(()) => debug!("Cached key '{}' with TTL {}s", key, ttl),
            Err(e) => error!("Failed to set cache key '{}': {:?}", key, e),
        }
    }

    async fn delete_from_cache(&self, key: &str) {
        if let Some(mut conn) = self.get_conn().await
            && let Err(e) = redis::cmd("DEL")
                .arg(key)
                .query_async::<()>(&mut conn)
                .await
        {
            error!("Failed to delete key '{}': {:?}", key, e);
        }
    }

    async fn delete_by_prefix(&self, prefix: &str) {
        let Some(mut conn) = self.get_conn().await else {
            return;
        };

        let pattern = format!("{prefix}*");
        let mut cursor: u64 = 0;
        let mut removed = 0;

        loop {
            let result: redis::RedisResult<(u64, Vec<String>)> = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(100)
                .query_async(&mut conn)
                .await;

            let (next, keys) = match result {
                Ok(page) => page,
                Err(e) => {
                    error!("Failed to scan keys matching '{}': {:?}", pattern, e);
                    return;
                }
            };

            if !keys.is_empty() {
                match redis::cmd("DEL")
                    .arg(&keys)
                    .query_async::<()>(&mut conn)
                    .await
                {
                    Ok(()) => removed += keys.len(),
                    Err(e) => error!("Failed to delete keys matching '{}': {:?}", pattern, e),
                }
            }

            if next == 0 {
                break;
            }
            cursor = next;
        }

        debug!("Removed {} keys matching '{}'", removed, pattern);
    }
}
