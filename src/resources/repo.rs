use async_trait::async_trait;
use sqlx::PgPool;

use super::repo_types::{NewResource, Resource};
use crate::error::StoreError;

#[async_trait]
pub trait ResourceRepo: Send + Sync {
    async fn insert(&self, new: NewResource) -> Result<Resource, StoreError>;
    async fn get_by_id(&self, id: i32) -> Result<Option<Resource>, StoreError>;
    async fn get_by_owner(&self, user_id: i32) -> Result<Vec<Resource>, StoreError>;
    async fn delete(&self, id: i32) -> Result<u64, StoreError>;
}

#[derive(Clone)]
pub struct PgResourceRepo {
    db: PgPool,
}

impl PgResourceRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ResourceRepo for PgResourceRepo {
    async fn insert(&self, new: NewResource) -> Result<Resource, StoreError> {
        sqlx::query_as::<_, Resource>(
            r#"
            INSERT INTO resources (resource_name, resource_url, type, notes, user_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, resource_name, resource_url, type, notes, user_id
            "#,
        )
        .bind(new.resource_name)
        .bind(new.resource_url)
        .bind(new.kind)
        .bind(new.notes)
        .bind(new.user_id)
        .fetch_one(&self.db)
        .await
        .map_err(StoreError::from_sqlx)
    }

    async fn get_by_id(&self, id: i32) -> Result<Option<Resource>, StoreError> {
        sqlx::query_as::<_, Resource>(
            r#"
            SELECT id, resource_name, resource_url, type, notes, user_id
            FROM resources
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .map_err(StoreError::from_sqlx)
    }

    async fn get_by_owner(&self, user_id: i32) -> Result<Vec<Resource>, StoreError> {
        sqlx::query_as::<_, Resource>(
            r#"
            SELECT id, resource_name, resource_url, type, notes, user_id
            FROM resources
            WHERE user_id = $1
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await
        .map_err(StoreError::from_sqlx)
    }

    async fn delete(&self, id: i32) -> Result<u64, StoreError> {
        let res = sqlx::query("DELETE FROM resources WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .map_err(StoreError::from_sqlx)?;
        Ok(res.rows_affected())
    }
}
