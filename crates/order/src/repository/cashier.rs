use crate::{abstract_trait::cashier::CashierQueryRepositoryTrait, model::cashier::Cashier};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use tracing::error;

#[derive(Clone)]
pub struct CashierQueryRepository {
    db: ConnectionPool,
}

impl CashierQueryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CashierQueryRepositoryTrait for CashierQueryRepository {
    async fn find_by_id(&self, cashier_id: i32) -> Result<Option<Cashier>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        sqlx::query_as::<_, Cashier>(
            r#"
            SELECT cashier_id, merchant_id, name, created_at, updated_at, deleted_at
            FROM cashiers
            WHERE cashier_id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(cashier_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch cashier {}: {:?}", cashier_id, e);
            RepositoryError::from(e)
        })
    }
}
