use crate::{
    abstract_trait::{
        cashier::DynCashierQueryRepository,
        merchant::DynMerchantQueryRepository,
        order::{
            repository::{DynOrderCommandRepository, DynOrderQueryRepository},
            service::OrderCommandServiceTrait,
        },
        order_item::repository::{DynOrderItemCommandRepository, DynOrderItemQueryRepository},
        product::{DynProductCommandRepository, DynProductQueryRepository},
    },
    cache,
    domain::{
        requests::{
            order::{
                CreateOrderItemRequest, CreateOrderRecordRequest, CreateOrderRequest,
                UpdateOrderItemRequest, UpdateOrderRecordRequest, UpdateOrderRequest,
            },
            order_item::{CreateOrderItemRecordRequest, UpdateOrderItemRecordRequest},
            product::UpdateProductStockRequest,
        },
        response::{
            api::ApiResponse,
            order::{OrderResponse, OrderResponseDeleteAt},
        },
    },
    model::{order::Order as OrderModel, order_item::OrderItem, product::Product},
    service::observability::Observability,
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use shared::{
    abstract_trait::DynCacheStore,
    errors::{ServiceError, WorkflowError, WriteLedger},
    utils::{Method, TracingContext},
};
use tracing::{error, info, warn};
use validator::Validate;

/// Drives order writes across the order, order item and product stores.
///
/// Store calls commit one by one. A failure stops the workflow where it is
/// and the returned [`WorkflowError`] reports how many writes already landed.
#[derive(Clone)]
pub struct OrderCommandService {
    merchant_query: DynMerchantQueryRepository,
    cashier_query: DynCashierQueryRepository,
    product_query: DynProductQueryRepository,
    product_command: DynProductCommandRepository,
    query: DynOrderQueryRepository,
    command: DynOrderCommandRepository,
    order_item_query: DynOrderItemQueryRepository,
    order_item_command: DynOrderItemCommandRepository,
    cache_store: DynCacheStore,
    stock_update_max_retries: u32,
    observability: Observability,
}

pub struct OrderCommandServiceDeps {
    pub merchant_query: DynMerchantQueryRepository,
    pub cashier_query: DynCashierQueryRepository,
    pub product_query: DynProductQueryRepository,
    pub product_command: DynProductCommandRepository,
    pub query: DynOrderQueryRepository,
    pub command: DynOrderCommandRepository,
    pub order_item_query: DynOrderItemQueryRepository,
    pub order_item_command: DynOrderItemCommandRepository,
    pub cache_store: DynCacheStore,
    pub stock_update_max_retries: u32,
}

impl OrderCommandService {
    pub fn new(deps: OrderCommandServiceDeps, registry: &mut Registry) -> Self {
        let OrderCommandServiceDeps {
            merchant_query,
            cashier_query,
            product_query,
            product_command,
            query,
            command,
            order_item_query,
            order_item_command,
            cache_store,
            stock_update_max_retries,
        } = deps;

        let observability = Observability::new(
            "order-command-service",
            "order_command_service",
            "OrderCommandService",
            registry,
        );

        Self {
            merchant_query,
            cashier_query,
            product_query,
            product_command,
            query,
            command,
            order_item_query,
            order_item_command,
            cache_store,
            stock_update_max_retries,
            observability,
        }
    }

    fn fail(
        &self,
        tracing_ctx: &TracingContext,
        operation: &str,
        method: Method,
        err: ServiceError,
        ledger: &WriteLedger,
    ) -> WorkflowError {
        let progress = ledger.progress();
        let log_message = format!("{operation} failed: {err} ({progress:?})");
        self.observability
            .complete_tracing_error(tracing_ctx, operation, method, &log_message);

        WorkflowError::new(err, progress, tracing_ctx.trace_id())
    }

    async fn invalidate_order_cache(&self, order_id: i32) {
        self.cache_store
            .delete_from_cache(&cache::order_by_id(order_id))
            .await;
        self.cache_store
            .delete_from_cache(&cache::items_by_order(order_id))
            .await;
    }

    async fn invalidate_all_order_cache(&self) {
        self.cache_store
            .delete_by_prefix(cache::ORDER_BY_ID_PREFIX)
            .await;
        self.cache_store
            .delete_by_prefix(cache::ITEMS_BY_ORDER_PREFIX)
            .await;
    }

    async fn find_product(&self, product_id: i32) -> Result<Product, ServiceError> {
        self.product_query
            .find_by_id(product_id)
            .await?
            .ok_or(ServiceError::ProductNotFound(product_id))
    }

    async fn find_order(&self, order_id: i32) -> Result<OrderModel, ServiceError> {
        self.query
            .find_by_id(order_id)
            .await?
            .ok_or(ServiceError::OrderNotFound(order_id))
    }

    /// Applies `change` to the product's stock with a compare-and-set write,
    /// re-reading the product after each lost race. A negative `change` is a
    /// debit and is refused when it would take the stock below zero.
    async fn apply_stock_change(
        &self,
        mut product: Product,
        change: i32,
        ledger: &mut WriteLedger,
    ) -> Result<Product, ServiceError> {
        let product_id = product.product_id;
        let mut retries = 0;

        loop {
            let next = product.count_in_stock.checked_add(change).ok_or_else(|| {
                ServiceError::Internal(format!(
                    "stock of product {product_id} out of range: {} + {change}",
                    product.count_in_stock
                ))
            })?;
            if next < 0 {
                return Err(ServiceError::InsufficientStock {
                    product_id,
                    requested: -change,
                    available: product.count_in_stock,
                });
            }

            let req = UpdateProductStockRequest {
                product_id,
                expected_count: product.count_in_stock,
                count_in_stock: next,
            };

            match self.product_command.update_count_stock(&req).await {
                Ok(updated) => {
                    ledger.record();
                    return Ok(updated);
                }
                Err(e) if e.is_conflict() && retries < self.stock_update_max_retries => {
                    retries += 1;
                    warn!(
                        "🔁 Stock of product {} changed concurrently, retry {}/{}",
                        product_id, retries, self.stock_update_max_retries
                    );
                    product = self.find_product(product_id).await?;
                }
                Err(e) if e.is_conflict() => {
                    return Err(ServiceError::StockConflict(product_id));
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Check and debit stock for one new line, then create its item.
    async fn add_line(
        &self,
        order_id: i32,
        line: &CreateOrderItemRequest,
        ledger: &mut WriteLedger,
    ) -> Result<OrderItem, ServiceError> {
        let product = self.find_product(line.product_id).await?;

        if product.count_in_stock < line.quantity {
            return Err(ServiceError::InsufficientStock {
                product_id: product.product_id,
                requested: line.quantity,
                available: product.count_in_stock,
            });
        }

        let product = self
            .apply_stock_change(product, -line.quantity, ledger)
            .await?;

        let item = self
            .order_item_command
            .create_order_item(&CreateOrderItemRecordRequest {
                order_id,
                product_id: product.product_id,
                quantity: line.quantity,
                price: product.price,
            })
            .await?;
        ledger.record();

        Ok(item)
    }

    /// Edits an existing line in place and moves stock by the quantity delta.
    /// Stock is adjusted before the item row is written.
    async fn edit_line(
        &self,
        order_id: i32,
        existing: &OrderItem,
        line: &UpdateOrderItemRequest,
        ledger: &mut WriteLedger,
    ) -> Result<OrderItem, ServiceError> {
        let product = self.find_product(line.product_id).await?;
        let same_product = existing.product_id == line.product_id;

        let previous = if same_product {
            None
        } else {
            Some(self.find_product(existing.product_id).await?)
        };

        let debit = if same_product {
            line.quantity - existing.quantity
        } else {
            line.quantity
        };

        if debit > 0 && product.count_in_stock < debit {
            return Err(ServiceError::InsufficientStock {
                product_id: product.product_id,
                requested: debit,
                available: product.count_in_stock,
            });
        }

        let product = if debit != 0 {
            self.apply_stock_change(product, -debit, ledger).await?
        } else {
            product
        };

        let updated = self
            .order_item_command
            .update_order_item(&UpdateOrderItemRecordRequest {
                order_item_id: existing.order_item_id,
                order_id,
                product_id: product.product_id,
                quantity: line.quantity,
                price: product.price,
            })
            .await?;
        ledger.record();

        if let Some(previous) = previous {
            self.apply_stock_change(previous, existing.quantity, ledger)
                .await?;
        }

        Ok(updated)
    }

    async fn refresh_total(
        &self,
        order_id: i32,
        ledger: &mut WriteLedger,
    ) -> Result<OrderModel, ServiceError> {
        let total_price = self
            .order_item_query
            .calculate_total_price(order_id)
            .await?;

        let order = self
            .command
            .update_order(&UpdateOrderRecordRequest {
                order_id,
                total_price,
            })
            .await?;
        ledger.record();

        Ok(order)
    }

    async fn run_create_order(
        &self,
        req: &CreateOrderRequest,
        ledger: &mut WriteLedger,
    ) -> Result<OrderModel, ServiceError> {
        req.validate()?;

        self.merchant_query
            .find_by_id(req.merchant_id)
            .await?
            .ok_or(ServiceError::MerchantNotFound(req.merchant_id))?;

        self.cashier_query
            .find_by_id(req.cashier_id)
            .await?
            .ok_or(ServiceError::CashierNotFound(req.cashier_id))?;

        let order = self
            .command
            .create_order(&CreateOrderRecordRequest {
                merchant_id: req.merchant_id,
                cashier_id: req.cashier_id,
            })
            .await?;
        ledger.record();

        for line in &req.items {
            self.add_line(order.order_id, line, ledger).await?;
        }

        self.refresh_total(order.order_id, ledger).await
    }

    async fn run_update_order(
        &self,
        req: &UpdateOrderRequest,
        ledger: &mut WriteLedger,
    ) -> Result<OrderModel, ServiceError> {
        req.validate()?;

        let order = self.find_order(req.order_id).await?;
        if order.is_trashed() {
            return Err(ServiceError::OrderTrashed(order.order_id));
        }

        let mut items = self
            .order_item_query
            .find_order_item_by_order(order.order_id)
            .await?;

        for line in &req.items {
            match line.existing_item_id() {
                Some(order_item_id) => {
                    let position = items
                        .iter()
                        .position(|i| i.order_item_id == order_item_id && !i.is_trashed())
                        .ok_or(ServiceError::OrderItemNotFound(order_item_id))?;

                    let updated = self
                        .edit_line(order.order_id, &items[position], line, ledger)
                        .await?;
                    items[position] = updated;
                }
                None => {
                    let created = self
                        .add_line(
                            order.order_id,
                            &CreateOrderItemRequest {
                                product_id: line.product_id,
                                quantity: line.quantity,
                            },
                            ledger,
                        )
                        .await?;
                    items.push(created);
                }
            }
        }

        self.refresh_total(order.order_id, ledger).await
    }

    async fn run_trashed_order(
        &self,
        order_id: i32,
        ledger: &mut WriteLedger,
    ) -> Result<OrderModel, ServiceError> {
        let order = self.find_order(order_id).await?;
        if order.is_trashed() {
            return Err(ServiceError::OrderAlreadyTrashed(order_id));
        }

        let items = self
            .order_item_query
            .find_order_item_by_order(order_id)
            .await?;

        if let Some(item) = items.iter().find(|i| i.is_trashed()) {
            return Err(ServiceError::OrderItemAlreadyTrashed(item.order_item_id));
        }

        for item in &items {
            self.order_item_command
                .trash_order_item(item.order_item_id)
                .await?;
            ledger.record();
        }

        let order = self.command.trash_order(order_id).await?;
        ledger.record();

        Ok(order)
    }

    async fn run_restore_order(
        &self,
        order_id: i32,
        ledger: &mut WriteLedger,
    ) -> Result<OrderModel, ServiceError> {
        let order = self.find_order(order_id).await?;
        if !order.is_trashed() {
            return Err(ServiceError::OrderNotTrashed(order_id));
        }

        let items = self
            .order_item_query
            .find_order_item_by_order(order_id)
            .await?;

        for item in items.iter().filter(|i| i.is_trashed()) {
            self.order_item_command
                .restore_order_item(item.order_item_id)
                .await?;
            ledger.record();
        }

        let order = self.command.restore_order(order_id).await?;
        ledger.record();

        Ok(order)
    }

    async fn run_delete_order_permanent(
        &self,
        order_id: i32,
        ledger: &mut WriteLedger,
    ) -> Result<bool, ServiceError> {
        self.find_order(order_id).await?;

        let items = self
            .order_item_query
            .find_order_item_by_order(order_id)
            .await?;

        for item in &items {
            let deleted = self
                .order_item_command
                .delete_order_item_permanent(item.order_item_id)
                .await?;

            if deleted {
                ledger.record();
            } else {
                warn!(
                    "⚠️ Order item {} of order {} was already gone",
                    item.order_item_id, order_id
                );
            }
        }

        let deleted = self.command.delete_order_permanent(order_id).await?;
        ledger.record();

        Ok(deleted)
    }

    async fn run_restore_all_order(&self, ledger: &mut WriteLedger) -> Result<bool, ServiceError> {
        match self.order_item_command.restore_all_order_item().await {
            Ok(true) => ledger.record(),
            Ok(false) => return Err(ServiceError::BulkOperationIncomplete("order_items")),
            Err(e) => {
                error!("❌ Bulk restore of order items failed: {e:?}");
                return Err(ServiceError::BulkOperationIncomplete("order_items"));
            }
        }

        if !self.command.restore_all_order().await? {
            return Err(ServiceError::BulkOperationIncomplete("orders"));
        }
        ledger.record();

        Ok(true)
    }

    async fn run_delete_all_order_permanent(
        &self,
        ledger: &mut WriteLedger,
    ) -> Result<bool, ServiceError> {
        match self.order_item_command.delete_all_order_item_permanent().await {
            Ok(true) => ledger.record(),
            Ok(false) => return Err(ServiceError::BulkOperationIncomplete("order_items")),
            Err(e) => {
                error!("❌ Bulk delete of order items failed: {e:?}");
                return Err(ServiceError::BulkOperationIncomplete("order_items"));
            }
        }

        if !self.command.delete_all_order_permanent().await? {
            return Err(ServiceError::BulkOperationIncomplete("orders"));
        }
        ledger.record();

        Ok(true)
    }
}

#[async_trait]
impl OrderCommandServiceTrait for OrderCommandService {
    async fn create_order(
        &self,
        req: &CreateOrderRequest,
    ) -> Result<ApiResponse<OrderResponse>, WorkflowError> {
        info!(
            "🏗️ Creating new order for merchant_id={} cashier_id={} ({} lines)",
            req.merchant_id,
            req.cashier_id,
            req.items.len()
        );

        let method = Method::Post;
        let tracing_ctx = self.observability.start_tracing(
            "create_order",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("operation", "create"),
                KeyValue::new("order.merchant_id", req.merchant_id.to_string()),
                KeyValue::new("order.cashier_id", req.cashier_id.to_string()),
            ],
        );

        let mut ledger = WriteLedger::new();

        match self.run_create_order(req, &mut ledger).await {
            Ok(order) => {
                let log_message = format!(
                    "Order {} created with total {}",
                    order.order_id, order.total_price
                );
                self.observability.complete_tracing_success(
                    &tracing_ctx,
                    "create_order",
                    method,
                    &log_message,
                );

                Ok(ApiResponse::success(
                    "Order created successfully",
                    OrderResponse::from(order),
                ))
            }
            Err(err) => Err(self.fail(&tracing_ctx, "create_order", method, err, &ledger)),
        }
    }

    async fn update_order(
        &self,
        req: &UpdateOrderRequest,
    ) -> Result<ApiResponse<OrderResponse>, WorkflowError> {
        info!(
            "🔄 Updating order_id={} ({} lines)",
            req.order_id,
            req.items.len()
        );

        let method = Method::Put;
        let tracing_ctx = self.observability.start_tracing(
            "update_order",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("operation", "update"),
                KeyValue::new("order.id", req.order_id.to_string()),
            ],
        );

        let mut ledger = WriteLedger::new();
        let result = self.run_update_order(req, &mut ledger).await;

        if ledger.committed() > 0 {
            self.invalidate_order_cache(req.order_id).await;
        }

        match result {
            Ok(order) => {
                let log_message = format!(
                    "Order {} updated with total {}",
                    order.order_id, order.total_price
                );
                self.observability.complete_tracing_success(
                    &tracing_ctx,
                    "update_order",
                    method,
                    &log_message,
                );

                Ok(ApiResponse::success(
                    "Order updated successfully",
                    OrderResponse::from(order),
                ))
            }
            Err(err) => Err(self.fail(&tracing_ctx, "update_order", method, err, &ledger)),
        }
    }

    async fn trashed_order(
        &self,
        order_id: i32,
    ) -> Result<ApiResponse<OrderResponseDeleteAt>, WorkflowError> {
        info!("🗑️ Trashing order_id={order_id}");

        let method = Method::Delete;
        let tracing_ctx = self.observability.start_tracing(
            "trashed_order",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("operation", "trash"),
                KeyValue::new("order.id", order_id.to_string()),
            ],
        );

        let mut ledger = WriteLedger::new();
        let result = self.run_trashed_order(order_id, &mut ledger).await;

        if ledger.committed() > 0 {
            self.invalidate_order_cache(order_id).await;
        }

        match result {
            Ok(order) => {
                self.observability.complete_tracing_success(
                    &tracing_ctx,
                    "trashed_order",
                    method,
                    &format!("Order {order_id} trashed"),
                );

                Ok(ApiResponse::success(
                    "Order trashed successfully",
                    OrderResponseDeleteAt::from(order),
                ))
            }
            Err(err) => Err(self.fail(&tracing_ctx, "trashed_order", method, err, &ledger)),
        }
    }

    async fn restore_order(
        &self,
        order_id: i32,
    ) -> Result<ApiResponse<OrderResponseDeleteAt>, WorkflowError> {
        info!("♻️ Restoring order_id={order_id}");

        let method = Method::Put;
        let tracing_ctx = self.observability.start_tracing(
            "restore_order",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("operation", "restore"),
                KeyValue::new("order.id", order_id.to_string()),
            ],
        );

        let mut ledger = WriteLedger::new();
        let result = self.run_restore_order(order_id, &mut ledger).await;

        if ledger.committed() > 0 {
            self.invalidate_order_cache(order_id).await;
        }

        match result {
            Ok(order) => {
                self.observability.complete_tracing_success(
                    &tracing_ctx,
                    "restore_order",
                    method,
                    &format!("Order {order_id} restored"),
                );

                Ok(ApiResponse::success(
                    "Order restored successfully",
                    OrderResponseDeleteAt::from(order),
                ))
            }
            Err(err) => Err(self.fail(&tracing_ctx, "restore_order", method, err, &ledger)),
        }
    }

    async fn delete_order_permanent(
        &self,
        order_id: i32,
    ) -> Result<ApiResponse<bool>, WorkflowError> {
        info!("🧨 Permanently deleting order_id={order_id}");

        let method = Method::Delete;
        let tracing_ctx = self.observability.start_tracing(
            "delete_order_permanent",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("operation", "delete"),
                KeyValue::new("order.id", order_id.to_string()),
            ],
        );

        let mut ledger = WriteLedger::new();
        let result = self.run_delete_order_permanent(order_id, &mut ledger).await;

        if ledger.committed() > 0 {
            self.invalidate_order_cache(order_id).await;
        }

        match result {
            Ok(deleted) => {
                self.observability.complete_tracing_success(
                    &tracing_ctx,
                    "delete_order_permanent",
                    method,
                    &format!("Order {order_id} permanently deleted"),
                );

                Ok(ApiResponse::success(
                    "Order permanently deleted",
                    deleted,
                ))
            }
            Err(err) => Err(self.fail(
                &tracing_ctx,
                "delete_order_permanent",
                method,
                err,
                &ledger,
            )),
        }
    }

    async fn restore_all_order(&self) -> Result<ApiResponse<bool>, WorkflowError> {
        info!("♻️ Restoring all trashed orders");

        let method = Method::Put;
        let tracing_ctx = self.observability.start_tracing(
            "restore_all_order",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("operation", "restore_all"),
            ],
        );

        let mut ledger = WriteLedger::new();
        let result = self.run_restore_all_order(&mut ledger).await;

        if ledger.committed() > 0 {
            self.invalidate_all_order_cache().await;
        }

        match result {
            Ok(restored) => {
                self.observability.complete_tracing_success(
                    &tracing_ctx,
                    "restore_all_order",
                    method,
                    "All trashed orders restored",
                );

                Ok(ApiResponse::success(
                    "All trashed orders restored successfully",
                    restored,
                ))
            }
            Err(err) => Err(self.fail(&tracing_ctx, "restore_all_order", method, err, &ledger)),
        }
    }

    async fn delete_all_order_permanent(&self) -> Result<ApiResponse<bool>, WorkflowError> {
        info!("🧨 Permanently deleting all trashed orders");

        let method = Method::Delete;
        let tracing_ctx = self.observability.start_tracing(
            "delete_all_order_permanent",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("operation", "delete_all"),
            ],
        );

        let mut ledger = WriteLedger::new();
        let result = self.run_delete_all_order_permanent(&mut ledger).await;

        if ledger.committed() > 0 {
            self.invalidate_all_order_cache().await;
        }

        match result {
            Ok(deleted) => {
                self.observability.complete_tracing_success(
                    &tracing_ctx,
                    "delete_all_order_permanent",
                    method,
                    "All trashed orders permanently deleted",
                );

                Ok(ApiResponse::success(
                    "All trashed orders permanently deleted",
                    deleted,
                ))
            }
            Err(err) => Err(self.fail(
                &tracing_ctx,
                "delete_all_order_permanent",
                method,
                err,
                &ledger,
            )),
        }
    }
}
