use async_trait::async_trait;
use sqlx::PgPool;

use super::TenantStore;
use crate::models::{Fingerprint, Tenant, TenantError, TenantResult};

/// Tenant store backed by the `tenant` table.
///
/// Every method is a single statement except `create` and `update`, which
/// re-read the row afterwards without a surrounding transaction.
#[derive(Debug, Clone)]
pub struct PgTenantStore {
    pool: PgPool,
}

impl PgTenantStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TenantStore for PgTenantStore {
    async fn get(&self, id: i64) -> TenantResult<Tenant> {
        sqlx::query_as::<_, Tenant>(
            r#"
            SELECT id, name, md5 FROM tenant WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(TenantError::NotFound)
    }

    async fn get_by_name(&self, name: &str) -> TenantResult<Tenant> {
        sqlx::query_as::<_, Tenant>(
            r#"
            SELECT id, name, md5 FROM tenant
            WHERE name = $1
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(TenantError::NotFound)
    }

    async fn create(&self, name: String) -> TenantResult<Tenant> {
        let md5 = Fingerprint::of(&name);

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO tenant (name, md5)
            VALUES ($1, $2)
            RETURNING id
            "#,
        )
        .bind(&name)
        .bind(md5.as_str())
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("Created tenant record: id={}", id);

        // A concurrent rename or delete between the two statements is visible here.
        self.get(id).await.map_err(|e| match e {
            TenantError::NotFound => {
                TenantError::Database(format!("Tenant {} vanished after insert", id))
            }
            other => other,
        })
    }

    async fn update(&self, id: i64, name: String) -> TenantResult<Tenant> {
        let result = sqlx::query(
            r#"
            UPDATE tenant SET name = $1 WHERE id = $2
            "#,
        )
        .bind(&name)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(TenantError::NotFound);
        }

        tracing::info!("Renamed tenant {} to {}", id, name);
        self.get(id).await
    }

    async fn delete(&self, id: i64) -> TenantResult<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM tenant WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        tracing::info!("Deleted tenant {} ({} rows)", id, result.rows_affected());
        Ok(())
    }
}
