use crate::{abstract_trait::merchant::MerchantQueryRepositoryTrait, model::merchant::Merchant};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use tracing::error;

#[derive(Clone)]
pub struct MerchantQueryRepository {
    db: ConnectionPool,
}

impl MerchantQueryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MerchantQueryRepositoryTrait for MerchantQueryRepository {
    async fn find_by_id(&self, merchant_id: i32) -> Result<Option<Merchant>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        sqlx::query_as::<_, Merchant>(
            r#"
            SELECT merchant_id, name, created_at, updated_at, deleted_at
            FROM merchants
            WHERE merchant_id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(merchant_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch merchant {}: {:?}", merchant_id, e);
            RepositoryError::from(e)
        })
    }
}
