use crate::{
    abstract_trait::{
        cashier::DynCashierQueryRepository,
        merchant::DynMerchantQueryRepository,
        order::{
            repository::{DynOrderCommandRepository, DynOrderQueryRepository},
            service::{DynOrderCommandService, DynOrderQueryService},
        },
        order_item::{
            repository::{DynOrderItemCommandRepository, DynOrderItemQueryRepository},
            service::DynOrderItemQueryService,
        },
        product::{DynProductCommandRepository, DynProductQueryRepository},
    },
    repository::{
        CashierQueryRepository, MerchantQueryRepository, OrderCommandRepository,
        OrderItemCommandRepository, OrderItemQueryRepository, OrderQueryRepository,
        ProductCommandRepository, ProductQueryRepository,
    },
    service::{
        OrderCommandService, OrderCommandServiceDeps, OrderItemQueryService, OrderQueryService,
    },
};
use prometheus_client::registry::Registry;
use shared::{abstract_trait::DynCacheStore, config::ConnectionPool};
use std::{fmt, sync::Arc};

/// Every store the order services read from or write to.
#[derive(Clone)]
pub struct Repositories {
    pub merchant_query: DynMerchantQueryRepository,
    pub cashier_query: DynCashierQueryRepository,
    pub product_query: DynProductQueryRepository,
    pub product_command: DynProductCommandRepository,
    pub order_query: DynOrderQueryRepository,
    pub order_command: DynOrderCommandRepository,
    pub order_item_query: DynOrderItemQueryRepository,
    pub order_item_command: DynOrderItemCommandRepository,
}

impl Repositories {
    pub fn postgres(pool: ConnectionPool) -> Self {
        Self {
            merchant_query: Arc::new(MerchantQueryRepository::new(pool.clone())),
            cashier_query: Arc::new(CashierQueryRepository::new(pool.clone())),
            product_query: Arc::new(ProductQueryRepository::new(pool.clone())),
            product_command: Arc::new(ProductCommandRepository::new(pool.clone())),
            order_query: Arc::new(OrderQueryRepository::new(pool.clone())),
            order_command: Arc::new(OrderCommandRepository::new(pool.clone())),
            order_item_query: Arc::new(OrderItemQueryRepository::new(pool.clone())),
            order_item_command: Arc::new(OrderItemCommandRepository::new(pool)),
        }
    }
}

#[derive(Clone)]
pub struct DependenciesInject {
    pub order_query: DynOrderQueryService,
    pub order_command: DynOrderCommandService,
    pub order_item_query: DynOrderItemQueryService,
}

impl fmt::Debug for DependenciesInject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DependenciesInject")
            .field("order_query", &"OrderQueryService")
            .field("order_command", &"OrderCommandService")
            .field("order_item_query", &"OrderItemQueryService")
            .finish()
    }
}

#[derive(Clone)]
pub struct DependenciesInjectDeps {
    pub repositories: Repositories,
    pub cache_store: DynCacheStore,
    pub stock_update_max_retries: u32,
}

impl DependenciesInject {
    pub fn new(deps: DependenciesInjectDeps, registry: &mut Registry) -> Self {
        let DependenciesInjectDeps {
            repositories,
            cache_store,
            stock_update_max_retries,
        } = deps;

        let order_query = Arc::new(OrderQueryService::new(
            repositories.order_query.clone(),
            cache_store.clone(),
            registry,
        )) as DynOrderQueryService;

        let order_item_query = Arc::new(OrderItemQueryService::new(
            repositories.order_item_query.clone(),
            cache_store.clone(),
            registry,
        )) as DynOrderItemQueryService;

        let order_command_deps = OrderCommandServiceDeps {
            merchant_query: repositories.merchant_query,
            cashier_query: repositories.cashier_query,
            product_query: repositories.product_query,
            product_command: repositories.product_command,
            query: repositories.order_query,
            command: repositories.order_command,
            order_item_query: repositories.order_item_query,
            order_item_command: repositories.order_item_command,
            cache_store,
            stock_update_max_retries,
        };

        let order_command = Arc::new(OrderCommandService::new(order_command_deps, registry))
            as DynOrderCommandService;

        Self {
            order_query,
            order_command,
            order_item_query,
        }
    }
}
