use crate::{
    abstract_trait::order_item::{
        repository::DynOrderItemQueryRepository, service::OrderItemQueryServiceTrait,
    },
    cache,
    domain::response::{api::ApiResponse, order_item::OrderItemResponse},
    service::observability::Observability,
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use shared::{
    abstract_trait::DynCacheStore,
    cache::{get_json, set_json},
    errors::ServiceError,
    utils::Method,
};
use tracing::{error, info};

#[derive(Clone)]
pub struct OrderItemQueryService {
    query: DynOrderItemQueryRepository,
    cache_store: DynCacheStore,
    observability: Observability,
}

impl OrderItemQueryService {
    pub fn new(
        query: DynOrderItemQueryRepository,
        cache_store: DynCacheStore,
        registry: &mut Registry,
    ) -> Self {
        let observability = Observability::new(
            "order-item-query-service",
            "order_item_query_service",
            "OrderItemQueryService",
            registry,
        );

        Self {
            query,
            cache_store,
            observability,
        }
    }
}

#[async_trait]
impl OrderItemQueryServiceTrait for OrderItemQueryService {
    async fn find_order_item_by_order(
        &self,
        order_id: i32,
    ) -> Result<ApiResponse<Vec<OrderItemResponse>>, ServiceError> {
        info!("📦 Finding order items for order_id={order_id}");

        let method = Method::Get;
        let tracing_ctx = self.observability.start_tracing(
            "find_order_item_by_order",
            vec![
                KeyValue::new("component", "order_item"),
                KeyValue::new("order.id", order_id.to_string()),
            ],
        );

        let cache_key = cache::items_by_order(order_id);

        if let Some(cached) =
            get_json::<ApiResponse<Vec<OrderItemResponse>>>(self.cache_store.as_ref(), &cache_key)
                .await
        {
            self.observability.complete_tracing_success(
                &tracing_ctx,
                "find_order_item_by_order",
                method,
                "Order items retrieved from cache",
            );
            return Ok(cached);
        }

        let items = match self.query.find_order_item_by_order(order_id).await {
            Ok(items) => items,
            Err(e) => {
                error!("❌ Failed to fetch items of order {order_id}: {e:?}");
                self.observability.complete_tracing_error(
                    &tracing_ctx,
                    "find_order_item_by_order",
                    method,
                    "Database error",
                );
                return Err(ServiceError::Repo(e));
            }
        };

        let response = ApiResponse::success(
            "Order items retrieved successfully",
            items
                .into_iter()
                .map(OrderItemResponse::from)
                .collect::<Vec<_>>(),
        );

        set_json(
            self.cache_store.as_ref(),
            &cache_key,
            &response,
            cache::ttl(),
        )
        .await;

        self.observability.complete_tracing_success(
            &tracing_ctx,
            "find_order_item_by_order",
            method,
            &format!("Found {} items for order {order_id}", response.data.len()),
        );

        Ok(response)
    }
}
