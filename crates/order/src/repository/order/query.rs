use crate::{
    abstract_trait::order::repository::OrderQueryRepositoryTrait,
    domain::requests::order::FindAllOrder,
    model::order::{Order as OrderModel, OrderWithCount},
};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use tracing::{error, info};

#[derive(Clone)]
pub struct OrderQueryRepository {
    db: ConnectionPool,
}

#[derive(Clone, Copy)]
enum TrashFilter {
    Any,
    Active,
    Trashed,
}

impl TrashFilter {
    fn clause(self) -> &'static str {
        match self {
            TrashFilter::Any => "TRUE",
            TrashFilter::Active => "deleted_at IS NULL",
            TrashFilter::Trashed => "deleted_at IS NOT NULL",
        }
    }
}

impl OrderQueryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }

    async fn find_page(
        &self,
        req: &FindAllOrder,
        filter: TrashFilter,
    ) -> Result<(Vec<OrderModel>, i64), RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(|e| {
            error!("❌ Failed to acquire DB connection: {:?}", e);
            RepositoryError::from(e)
        })?;

        let limit = req.page_size as i64;
        let offset = req.offset();

        let search_pattern = if req.search.trim().is_empty() {
            None
        } else {
            Some(req.search.clone())
        };

        let sql = format!(
            r#"
            SELECT
                order_id, merchant_id, cashier_id, total_price,
                created_at, updated_at, deleted_at,
                COUNT(*) OVER() AS total_count
            FROM orders
            WHERE {}
              AND ($1::TEXT IS NULL
                   OR order_id::TEXT ILIKE '%' || $1 || '%'
                   OR merchant_id::TEXT ILIKE '%' || $1 || '%')
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
            filter.clause()
        );

        let rows = sqlx::query_as::<_, OrderWithCount>(&sql)
            .bind(search_pattern)
            .bind(limit)
            .bind(offset)
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| {
                error!("❌ Failed to fetch orders: {:?}", e);
                RepositoryError::from(e)
            })?;

        let total = rows.first().map(|r| r.total_count).unwrap_or(0);
        let orders = rows.into_iter().map(|r| r.order).collect();

        Ok((orders, total))
    }
}

#[async_trait]
impl OrderQueryRepositoryTrait for OrderQueryRepository {
    async fn find_all(
        &self,
        req: &FindAllOrder,
    ) -> Result<(Vec<OrderModel>, i64), RepositoryError> {
        info!("📦 Fetching orders with search {:?}", req.search);
        self.find_page(req, TrashFilter::Any).await
    }

    async fn find_by_active(
        &self,
        req: &FindAllOrder,
    ) -> Result<(Vec<OrderModel>, i64), RepositoryError> {
        info!("📦 Fetching active orders with search {:?}", req.search);
        self.find_page(req, TrashFilter::Active).await
    }

    async fn find_by_trashed(
        &self,
        req: &FindAllOrder,
    ) -> Result<(Vec<OrderModel>, i64), RepositoryError> {
        info!("🗑️ Fetching trashed orders with search {:?}", req.search);
        self.find_page(req, TrashFilter::Trashed).await
    }

    async fn find_by_id(&self, order_id: i32) -> Result<Option<OrderModel>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        sqlx::query_as::<_, OrderModel>(
            r#"
            SELECT order_id, merchant_id, cashier_id, total_price, created_at, updated_at, deleted_at
            FROM orders
            WHERE order_id = $1
            "#,
        )
        .bind(order_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch order {}: {:?}", order_id, e);
            RepositoryError::from(e)
        })
    }
}
