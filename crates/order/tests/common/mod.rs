#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Duration, NaiveDateTime, Utc};
use order::{
    abstract_trait::{
        cashier::CashierQueryRepositoryTrait,
        merchant::MerchantQueryRepositoryTrait,
        order::{
            repository::{OrderCommandRepositoryTrait, OrderQueryRepositoryTrait},
            service::{DynOrderCommandService, DynOrderQueryService},
        },
        order_item::{
            repository::{OrderItemCommandRepositoryTrait, OrderItemQueryRepositoryTrait},
            service::DynOrderItemQueryService,
        },
        product::{ProductCommandRepositoryTrait, ProductQueryRepositoryTrait},
    },
    di::{DependenciesInjectDeps, Repositories},
    domain::requests::{
        order::{CreateOrderRecordRequest, FindAllOrder, UpdateOrderRecordRequest},
        order_item::{CreateOrderItemRecordRequest, UpdateOrderItemRecordRequest},
        product::UpdateProductStockRequest,
    },
    model::{
        cashier::Cashier, merchant::Merchant, order::Order, order_item::OrderItem,
        product::Product,
    },
    state::AppState,
};
use shared::{abstract_trait::CacheStoreTrait, errors::RepositoryError};
use std::{
    collections::{BTreeMap, HashMap, HashSet},
    sync::{Arc, Mutex},
};

fn now() -> Option<NaiveDateTime> {
    Some(Utc::now().naive_utc())
}

#[derive(Default)]
struct StoreState {
    merchants: HashMap<i32, Merchant>,
    cashiers: HashMap<i32, Cashier>,
    products: HashMap<i32, Product>,
    orders: BTreeMap<i32, Order>,
    items: BTreeMap<i32, OrderItem>,
    next_order_id: i32,
    next_item_id: i32,
    writes: Vec<String>,
    failing: HashSet<&'static str>,
    bulk_reports_false: bool,
    stock_thefts: HashMap<i32, Vec<i32>>,
    forced_conflicts: HashMap<i32, u32>,
}

impl StoreState {
    fn check(&self, op: &'static str) -> Result<(), RepositoryError> {
        if self.failing.contains(op) {
            return Err(RepositoryError::Custom(format!("injected failure in {op}")));
        }
        Ok(())
    }
}

/// In-memory stand-in for every store the order services use.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<StoreState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_merchant(&self, merchant_id: i32) {
        let mut state = self.state.lock().unwrap();
        state.merchants.insert(
            merchant_id,
            Merchant {
                merchant_id,
                name: format!("merchant-{merchant_id}"),
                created_at: now(),
                updated_at: now(),
                deleted_at: None,
            },
        );
    }

    pub fn add_cashier(&self, cashier_id: i32, merchant_id: i32) {
        let mut state = self.state.lock().unwrap();
        state.cashiers.insert(
            cashier_id,
            Cashier {
                cashier_id,
                merchant_id,
                name: format!("cashier-{cashier_id}"),
                created_at: now(),
                updated_at: now(),
                deleted_at: None,
            },
        );
    }

    pub fn add_product(&self, product_id: i32, price: i32, count_in_stock: i32) {
        let mut state = self.state.lock().unwrap();
        state.products.insert(
            product_id,
            Product {
                product_id,
                merchant_id: 1,
                name: format!("product-{product_id}"),
                price,
                count_in_stock,
                created_at: now(),
                updated_at: now(),
                deleted_at: None,
            },
        );
    }

    pub fn trash_product(&self, product_id: i32) {
        let mut state = self.state.lock().unwrap();
        if let Some(product) = state.products.get_mut(&product_id) {
            product.deleted_at = now();
        }
    }

    pub fn trash_merchant(&self, merchant_id: i32) {
        let mut state = self.state.lock().unwrap();
        if let Some(merchant) = state.merchants.get_mut(&merchant_id) {
            merchant.deleted_at = now();
        }
    }

    pub fn set_price(&self, product_id: i32, price: i32) {
        let mut state = self.state.lock().unwrap();
        if let Some(product) = state.products.get_mut(&product_id) {
            product.price = price;
        }
    }

    pub fn set_stock(&self, product_id: i32, count_in_stock: i32) {
        let mut state = self.state.lock().unwrap();
        if let Some(product) = state.products.get_mut(&product_id) {
            product.count_in_stock = count_in_stock;
        }
    }

    /// Units held by active order items of a product.
    pub fn active_quantity(&self, product_id: i32) -> i32 {
        self.state
            .lock()
            .unwrap()
            .items
            .values()
            .filter(|i| i.product_id == product_id && i.deleted_at.is_none())
            .map(|i| i.quantity)
            .sum()
    }

    pub fn stock(&self, product_id: i32) -> i32 {
        self.state.lock().unwrap().products[&product_id].count_in_stock
    }

    pub fn order(&self, order_id: i32) -> Option<Order> {
        self.state.lock().unwrap().orders.get(&order_id).cloned()
    }

    pub fn orders(&self) -> Vec<Order> {
        self.state.lock().unwrap().orders.values().cloned().collect()
    }

    pub fn items_of(&self, order_id: i32) -> Vec<OrderItem> {
        self.state
            .lock()
            .unwrap()
            .items
            .values()
            .filter(|i| i.order_id == order_id)
            .cloned()
            .collect()
    }

    pub fn all_items(&self) -> Vec<OrderItem> {
        self.state.lock().unwrap().items.values().cloned().collect()
    }

    /// Every committed write, in order, as `operation:id`.
    pub fn writes(&self) -> Vec<String> {
        self.state.lock().unwrap().writes.clone()
    }

    pub fn clear_writes(&self) {
        self.state.lock().unwrap().writes.clear();
    }

    pub fn fail_on(&self, op: &'static str) {
        self.state.lock().unwrap().failing.insert(op);
    }

    pub fn bulk_reports_false(&self) {
        self.state.lock().unwrap().bulk_reports_false = true;
    }

    /// Simulates another writer taking `amount` units right before the next stock write.
    pub fn steal_stock_before_next_write(&self, product_id: i32, amount: i32) {
        self.state
            .lock()
            .unwrap()
            .stock_thefts
            .entry(product_id)
            .or_default()
            .push(amount);
    }

    /// The next `times` stock writes on the product lose their compare-and-set.
    pub fn force_stock_conflicts(&self, product_id: i32, times: u32) {
        self.state
            .lock()
            .unwrap()
            .forced_conflicts
            .insert(product_id, times);
    }
}

#[async_trait]
impl MerchantQueryRepositoryTrait for InMemoryStore {
    async fn find_by_id(&self, merchant_id: i32) -> Result<Option<Merchant>, RepositoryError> {
        let state = self.state.lock().unwrap();
        state.check("find_merchant")?;
        Ok(state
            .merchants
            .get(&merchant_id)
            .filter(|m| m.deleted_at.is_none())
            .cloned())
    }
}

#[async_trait]
impl CashierQueryRepositoryTrait for InMemoryStore {
    async fn find_by_id(&self, cashier_id: i32) -> Result<Option<Cashier>, RepositoryError> {
        let state = self.state.lock().unwrap();
        state.check("find_cashier")?;
        Ok(state
            .cashiers
            .get(&cashier_id)
            .filter(|c| c.deleted_at.is_none())
            .cloned())
    }
}

#[async_trait]
impl ProductQueryRepositoryTrait for InMemoryStore {
    async fn find_by_id(&self, product_id: i32) -> Result<Option<Product>, RepositoryError> {
        let state = self.state.lock().unwrap();
        state.check("find_product")?;
        Ok(state
            .products
            .get(&product_id)
            .filter(|p| p.deleted_at.is_none())
            .cloned())
    }
}

#[async_trait]
impl ProductCommandRepositoryTrait for InMemoryStore {
    async fn update_count_stock(
        &self,
        req: &UpdateProductStockRequest,
    ) -> Result<Product, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        state.check("update_count_stock")?;

        if let Some(remaining) = state.forced_conflicts.get_mut(&req.product_id)
            && *remaining > 0
        {
            *remaining -= 1;
            return Err(RepositoryError::Conflict("forced".into()));
        }

        let theft = state
            .stock_thefts
            .get_mut(&req.product_id)
            .and_then(|t| (!t.is_empty()).then(|| t.remove(0)));

        let product = state
            .products
            .get_mut(&req.product_id)
            .filter(|p| p.deleted_at.is_none())
            .ok_or_else(|| RepositoryError::Conflict("product missing".into()))?;

        if let Some(amount) = theft {
            product.count_in_stock -= amount;
        }

        if product.count_in_stock != req.expected_count {
            return Err(RepositoryError::Conflict(format!(
                "expected {} found {}",
                req.expected_count, product.count_in_stock
            )));
        }

        product.count_in_stock = req.count_in_stock;
        product.updated_at = now();
        let product = product.clone();

        state
            .writes
            .push(format!("update_count_stock:{}", req.product_id));
        Ok(product)
    }
}

#[async_trait]
impl OrderQueryRepositoryTrait for InMemoryStore {
    async fn find_all(
        &self,
        req: &FindAllOrder,
    ) -> Result<(Vec<Order>, i64), RepositoryError> {
        Ok(self.page(req, |_| true))
    }

    async fn find_by_active(
        &self,
        req: &FindAllOrder,
    ) -> Result<(Vec<Order>, i64), RepositoryError> {
        Ok(self.page(req, |o| !o.is_trashed()))
    }

    async fn find_by_trashed(
        &self,
        req: &FindAllOrder,
    ) -> Result<(Vec<Order>, i64), RepositoryError> {
        Ok(self.page(req, |o| o.is_trashed()))
    }

    async fn find_by_id(&self, order_id: i32) -> Result<Option<Order>, RepositoryError> {
        let state = self.state.lock().unwrap();
        state.check("find_order")?;
        Ok(state.orders.get(&order_id).cloned())
    }
}

impl InMemoryStore {
    fn page(&self, req: &FindAllOrder, keep: impl Fn(&Order) -> bool) -> (Vec<Order>, i64) {
        let state = self.state.lock().unwrap();
        let matching: Vec<Order> = state
            .orders
            .values()
            .filter(|o| keep(o))
            .filter(|o| req.search.is_empty() || o.order_id.to_string().contains(&req.search))
            .cloned()
            .collect();

        let total = matching.len() as i64;
        let offset = usize::try_from(req.offset()).unwrap_or(usize::MAX);
        let page = matching
            .into_iter()
            .skip(offset)
            .take(req.page_size as usize)
            .collect();

        (page, total)
    }
}

#[async_trait]
impl OrderCommandRepositoryTrait for InMemoryStore {
    async fn create_order(&self, req: &CreateOrderRecordRequest) -> Result<Order, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        state.check("create_order")?;

        state.next_order_id += 1;
        let order = Order {
            order_id: state.next_order_id,
            merchant_id: req.merchant_id,
            cashier_id: req.cashier_id,
            total_price: 0,
            created_at: now(),
            updated_at: now(),
            deleted_at: None,
        };
        state.orders.insert(order.order_id, order.clone());
        state.writes.push(format!("create_order:{}", order.order_id));
        Ok(order)
    }

    async fn update_order(&self, req: &UpdateOrderRecordRequest) -> Result<Order, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        state.check("update_order")?;

        let order = state
            .orders
            .get_mut(&req.order_id)
            .ok_or(RepositoryError::NotFound)?;
        order.total_price = req.total_price;
        order.updated_at = now();
        let order = order.clone();

        state.writes.push(format!("update_order:{}", req.order_id));
        Ok(order)
    }

    async fn trash_order(&self, order_id: i32) -> Result<Order, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        state.check("trash_order")?;

        let order = state
            .orders
            .get_mut(&order_id)
            .filter(|o| o.deleted_at.is_none())
            .ok_or(RepositoryError::NotFound)?;
        order.deleted_at = now();
        let order = order.clone();

        state.writes.push(format!("trash_order:{order_id}"));
        Ok(order)
    }

    async fn restore_order(&self, order_id: i32) -> Result<Order, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        state.check("restore_order")?;

        let order = state
            .orders
            .get_mut(&order_id)
            .filter(|o| o.deleted_at.is_some())
            .ok_or(RepositoryError::NotFound)?;
        order.deleted_at = None;
        let order = order.clone();

        state.writes.push(format!("restore_order:{order_id}"));
        Ok(order)
    }

    async fn delete_order_permanent(&self, order_id: i32) -> Result<bool, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        state.check("delete_order_permanent")?;

        if state.items.values().any(|i| i.order_id == order_id) {
            return Err(RepositoryError::ForeignKey(format!(
                "order {order_id} still has items"
            )));
        }

        state
            .orders
            .remove(&order_id)
            .ok_or(RepositoryError::NotFound)?;
        state.writes.push(format!("delete_order:{order_id}"));
        Ok(true)
    }

    async fn restore_all_order(&self) -> Result<bool, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        state.check("restore_all_order")?;

        for order in state.orders.values_mut() {
            order.deleted_at = None;
        }
        state.writes.push("restore_all_order".into());
        Ok(!state.bulk_reports_false)
    }

    async fn delete_all_order_permanent(&self) -> Result<bool, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        state.check("delete_all_order_permanent")?;

        state.orders.retain(|_, o| o.deleted_at.is_none());
        state.writes.push("delete_all_order".into());
        Ok(!state.bulk_reports_false)
    }
}

#[async_trait]
impl OrderItemQueryRepositoryTrait for InMemoryStore {
    async fn find_order_item_by_order(
        &self,
        order_id: i32,
    ) -> Result<Vec<OrderItem>, RepositoryError> {
        let state = self.state.lock().unwrap();
        state.check("find_order_item_by_order")?;
        Ok(state
            .items
            .values()
            .filter(|i| i.order_id == order_id)
            .cloned()
            .collect())
    }

    async fn calculate_total_price(&self, order_id: i32) -> Result<i32, RepositoryError> {
        let state = self.state.lock().unwrap();
        state.check("calculate_total_price")?;
        Ok(state
            .items
            .values()
            .filter(|i| i.order_id == order_id && i.deleted_at.is_none())
            .map(|i| i.quantity * i.price)
            .sum())
    }
}

#[async_trait]
impl OrderItemCommandRepositoryTrait for InMemoryStore {
    async fn create_order_item(
        &self,
        req: &CreateOrderItemRecordRequest,
    ) -> Result<OrderItem, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        state.check("create_order_item")?;

        state.next_item_id += 1;
        let item = OrderItem {
            order_item_id: state.next_item_id,
            order_id: req.order_id,
            product_id: req.product_id,
            quantity: req.quantity,
            price: req.price,
            created_at: now(),
            updated_at: now(),
            deleted_at: None,
        };
        state.items.insert(item.order_item_id, item.clone());
        state
            .writes
            .push(format!("create_order_item:{}", item.order_item_id));
        Ok(item)
    }

    async fn update_order_item(
        &self,
        req: &UpdateOrderItemRecordRequest,
    ) -> Result<OrderItem, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        state.check("update_order_item")?;

        let item = state
            .items
            .get_mut(&req.order_item_id)
            .filter(|i| i.order_id == req.order_id && i.deleted_at.is_none())
            .ok_or(RepositoryError::NotFound)?;
        item.product_id = req.product_id;
        item.quantity = req.quantity;
        item.price = req.price;
        item.updated_at = now();
        let item = item.clone();

        state
            .writes
            .push(format!("update_order_item:{}", req.order_item_id));
        Ok(item)
    }

    async fn trash_order_item(&self, order_item_id: i32) -> Result<OrderItem, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        state.check("trash_order_item")?;

        let item = state
            .items
            .get_mut(&order_item_id)
            .filter(|i| i.deleted_at.is_none())
            .ok_or(RepositoryError::NotFound)?;
        item.deleted_at = now();
        let item = item.clone();

        state.writes.push(format!("trash_order_item:{order_item_id}"));
        Ok(item)
    }

    async fn restore_order_item(&self, order_item_id: i32) -> Result<OrderItem, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        state.check("restore_order_item")?;

        let item = state
            .items
            .get_mut(&order_item_id)
            .filter(|i| i.deleted_at.is_some())
            .ok_or(RepositoryError::NotFound)?;
        item.deleted_at = None;
        let item = item.clone();

        state
            .writes
            .push(format!("restore_order_item:{order_item_id}"));
        Ok(item)
    }

    async fn delete_order_item_permanent(
        &self,
        order_item_id: i32,
    ) -> Result<bool, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        state.check("delete_order_item_permanent")?;

        let removed = state.items.remove(&order_item_id).is_some();
        if removed {
            state
                .writes
                .push(format!("delete_order_item:{order_item_id}"));
        }
        Ok(removed)
    }

    async fn restore_all_order_item(&self) -> Result<bool, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        state.check("restore_all_order_item")?;

        if state.bulk_reports_false {
            return Ok(false);
        }
        for item in state.items.values_mut() {
            item.deleted_at = None;
        }
        state.writes.push("restore_all_order_item".into());
        Ok(true)
    }

    async fn delete_all_order_item_permanent(&self) -> Result<bool, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        state.check("delete_all_order_item_permanent")?;

        if state.bulk_reports_false {
            return Ok(false);
        }
        state.items.retain(|_, i| i.deleted_at.is_none());
        state.writes.push("delete_all_order_item".into());
        Ok(true)
    }
}

/// Cache fake that remembers deletions.
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, String>>,
    deleted: Mutex<Vec<String>>,
}

impl MemoryCache {
    pub fn contains(&self, key: &str) -> bool {
        self.entries.lock().unwrap().contains_key(key)
    }

    pub fn deleted_keys(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl CacheStoreTrait for MemoryCache {
    async fn get_from_cache(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    async fn set_to_cache(&self, key: &str, value: String, _expiration: Duration) {
        self.entries.lock().unwrap().insert(key.to_string(), value);
    }

    async fn delete_from_cache(&self, key: &str) {
        self.entries.lock().unwrap().remove(key);
        self.deleted.lock().unwrap().push(key.to_string());
    }

    async fn delete_by_prefix(&self, prefix: &str) {
        let mut entries = self.entries.lock().unwrap();
        let matching: Vec<String> = entries
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect();

        for key in matching {
            entries.remove(&key);
            self.deleted.lock().unwrap().push(key);
        }
    }
}

pub struct Harness {
    pub store: Arc<InMemoryStore>,
    pub cache: Arc<MemoryCache>,
    pub state: AppState,
}

impl Harness {
    pub fn command(&self) -> &DynOrderCommandService {
        &self.state.di_container.order_command
    }

    pub fn query(&self) -> &DynOrderQueryService {
        &self.state.di_container.order_query
    }

    pub fn items(&self) -> &DynOrderItemQueryService {
        &self.state.di_container.order_item_query
    }
}

pub fn harness_with_retries(stock_update_max_retries: u32) -> Harness {
    let store = Arc::new(InMemoryStore::new());
    let cache = Arc::new(MemoryCache::default());

    let repositories = Repositories {
        merchant_query: store.clone(),
        cashier_query: store.clone(),
        product_query: store.clone(),
        product_command: store.clone(),
        order_query: store.clone(),
        order_command: store.clone(),
        order_item_query: store.clone(),
        order_item_command: store.clone(),
    };

    let state = AppState::from_deps(DependenciesInjectDeps {
        repositories,
        cache_store: cache.clone(),
        stock_update_max_retries,
    });

    Harness {
        store,
        cache,
        state,
    }
}

/// Merchant 1 and cashier 1, no products.
pub fn harness() -> Harness {
    let h = harness_with_retries(3);
    h.store.add_merchant(1);
    h.store.add_cashier(1, 1);
    h
}
