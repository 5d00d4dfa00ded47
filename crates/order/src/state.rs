use crate::{
    config::myconfig::Config,
    di::{DependenciesInject, DependenciesInjectDeps, Repositories},
};
use anyhow::{Context, Result};
use prometheus_client::registry::Registry;
use shared::{
    abstract_trait::DynCacheStore,
    cache::CacheStore,
    config::{ConnectionPool, RedisClient},
};
use std::{fmt, sync::Arc};
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub di_container: DependenciesInject,
    pub registry: Arc<Registry>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("deps", &self.di_container)
            .field("registry", &self.registry)
            .finish()
    }
}

impl AppState {
    pub async fn new(pool: ConnectionPool, config: &Config) -> Result<Self> {
        info!("Initializing Redis connection for order service");
        let redis = RedisClient::new(&config.redis).context("Failed to connect to Redis")?;

        redis
            .ping()
            .await
            .context("Failed to ping Redis server")?;

        let cache_store = Arc::new(CacheStore::new(redis.pool.clone())) as DynCacheStore;

        let deps = DependenciesInjectDeps {
            repositories: Repositories::postgres(pool),
            cache_store,
            stock_update_max_retries: config.stock_update_max_retries,
        };

        Ok(Self::from_deps(deps))
    }

    /// Wires the services over already-built stores.
    pub fn from_deps(deps: DependenciesInjectDeps) -> Self {
        let mut registry = Registry::default();
        let di_container = DependenciesInject::new(deps, &mut registry);

        Self {
            di_container,
            registry: Arc::new(registry),
        }
    }
}
