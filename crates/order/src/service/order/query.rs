use crate::{
    abstract_trait::order::{repository::DynOrderQueryRepository, service::OrderQueryServiceTrait},
    cache,
    domain::{
        requests::order::FindAllOrder,
        response::{
            api::{ApiResponse, ApiResponsePagination},
            order::{OrderResponse, OrderResponseDeleteAt},
            pagination::Pagination,
        },
    },
    model::order::Order as OrderModel,
    service::observability::Observability,
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use shared::{
    abstract_trait::DynCacheStore,
    cache::{get_json, set_json},
    errors::{RepositoryError, ServiceError},
    utils::{Method, TracingContext},
};
use tracing::{error, info};
use validator::Validate;

#[derive(Clone)]
pub struct OrderQueryService {
    query: DynOrderQueryRepository,
    cache_store: DynCacheStore,
    observability: Observability,
}

impl OrderQueryService {
    pub fn new(
        query: DynOrderQueryRepository,
        cache_store: DynCacheStore,
        registry: &mut Registry,
    ) -> Self {
        let observability = Observability::new(
            "order-query-service",
            "order_query_service",
            "OrderQueryService",
            registry,
        );

        Self {
            query,
            cache_store,
            observability,
        }
    }

    fn page_tracing(&self, operation: &str, req: &FindAllOrder) -> TracingContext {
        self.observability.start_tracing(
            operation,
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("page", req.page.to_string()),
                KeyValue::new("page_size", req.page_size.to_string()),
                KeyValue::new("search", req.search.clone()),
            ],
        )
    }

    fn finish_page<T>(
        &self,
        tracing_ctx: &TracingContext,
        operation: &str,
        req: &FindAllOrder,
        result: Result<(Vec<OrderModel>, i64), RepositoryError>,
        message: &str,
    ) -> Result<ApiResponsePagination<Vec<T>>, ServiceError>
    where
        T: From<OrderModel>,
    {
        let (orders, total) = match result {
            Ok(res) => res,
            Err(e) => {
                let log_message = format!("Failed to {operation}: {e:?}");
                self.observability.complete_tracing_error(
                    tracing_ctx,
                    operation,
                    Method::Get,
                    &log_message,
                );
                return Err(ServiceError::Repo(e));
            }
        };

        let log_message = format!("Found {} orders (total: {total})", orders.len());
        self.observability
            .complete_tracing_success(tracing_ctx, operation, Method::Get, &log_message);

        Ok(ApiResponsePagination {
            status: "success".to_string(),
            message: message.to_string(),
            data: orders.into_iter().map(T::from).collect(),
            pagination: Pagination::new(req.page, req.page_size, total),
        })
    }
}

#[async_trait]
impl OrderQueryServiceTrait for OrderQueryService {
    async fn find_all(
        &self,
        req: &FindAllOrder,
    ) -> Result<ApiResponsePagination<Vec<OrderResponse>>, ServiceError> {
        info!(
            "📦 Finding all orders | Page: {}, Size: {}, Search: '{}'",
            req.page, req.page_size, req.search
        );
        req.validate()?;

        let tracing_ctx = self.page_tracing("find_all", req);
        let result = self.query.find_all(req).await;

        self.finish_page(
            &tracing_ctx,
            "find_all",
            req,
            result,
            "Orders retrieved successfully",
        )
    }

    async fn find_by_active(
        &self,
        req: &FindAllOrder,
    ) -> Result<ApiResponsePagination<Vec<OrderResponseDeleteAt>>, ServiceError> {
        info!(
            "🟢 Finding active orders | Page: {}, Size: {}, Search: '{}'",
            req.page, req.page_size, req.search
        );
        req.validate()?;

        let tracing_ctx = self.page_tracing("find_by_active", req);
        let result = self.query.find_by_active(req).await;

        self.finish_page(
            &tracing_ctx,
            "find_by_active",
            req,
            result,
            "Active orders retrieved successfully",
        )
    }

    async fn find_by_trashed(
        &self,
        req: &FindAllOrder,
    ) -> Result<ApiResponsePagination<Vec<OrderResponseDeleteAt>>, ServiceError> {
        info!(
            "🗑️ Finding trashed orders | Page: {}, Size: {}, Search: '{}'",
            req.page, req.page_size, req.search
        );
        req.validate()?;

        let tracing_ctx = self.page_tracing("find_by_trashed", req);
        let result = self.query.find_by_trashed(req).await;

        self.finish_page(
            &tracing_ctx,
            "find_by_trashed",
            req,
            result,
            "Trashed orders retrieved successfully",
        )
    }

    async fn find_by_id(&self, order_id: i32) -> Result<ApiResponse<OrderResponse>, ServiceError> {
        info!("🆔 Finding order by ID: {order_id}");

        let method = Method::Get;
        let tracing_ctx = self.observability.start_tracing(
            "find_by_id",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("operation", "find_by_id"),
                KeyValue::new("order.id", order_id.to_string()),
            ],
        );

        let cache_key = cache::order_by_id(order_id);

        if let Some(cached) =
            get_json::<ApiResponse<OrderResponse>>(self.cache_store.as_ref(), &cache_key).await
        {
            info!("✅ Found order {order_id} in cache");
            self.observability.complete_tracing_success(
                &tracing_ctx,
                "find_by_id",
                method,
                "Order retrieved from cache",
            );
            return Ok(cached);
        }

        let order = match self.query.find_by_id(order_id).await {
            Ok(Some(order)) => order,
            Ok(None) => {
                error!("❌ Order {order_id} not found");
                self.observability.complete_tracing_error(
                    &tracing_ctx,
                    "find_by_id",
                    method,
                    "Order not found",
                );
                return Err(ServiceError::OrderNotFound(order_id));
            }
            Err(e) => {
                error!("❌ Database error while finding order ID {order_id}: {e:?}");
                self.observability.complete_tracing_error(
                    &tracing_ctx,
                    "find_by_id",
                    method,
                    "Database error",
                );
                return Err(ServiceError::Repo(e));
            }
        };

        let response = ApiResponse::success("Order retrieved successfully", OrderResponse::from(order));

        set_json(
            self.cache_store.as_ref(),
            &cache_key,
            &response,
            cache::ttl(),
        )
        .await;

        self.observability.complete_tracing_success(
            &tracing_ctx,
            "find_by_id",
            method,
            &format!("Order {order_id} retrieved"),
        );

        Ok(response)
    }
}
