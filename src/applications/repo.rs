use async_trait::async_trait;
use sqlx::PgPool;

use super::repo_types::{Application, ApplicationChanges, NewApplication};
use crate::error::StoreError;

#[async_trait]
pub trait ApplicationRepo: Send + Sync {
    async fn insert(&self, new: NewApplication) -> Result<Application, StoreError>;
    async fn get_by_id(&self, id: i32) -> Result<Option<Application>, StoreError>;
    async fn get_by_owner(&self, user_id: i32) -> Result<Vec<Application>, StoreError>;
    async fn update(
        &self,
        id: i32,
        changes: ApplicationChanges,
    ) -> Result<Option<Application>, StoreError>;
    async fn delete(&self, id: i32) -> Result<u64, StoreError>;
}

const COLUMNS: &str = "id, job_name, company_name, website_url, date_applied, contact_name, \
                       contact_phone, contact_email, interview_date, status, notes, user_id";

#[derive(Clone)]
pub struct PgApplicationRepo {
    db: PgPool,
}

impl PgApplicationRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ApplicationRepo for PgApplicationRepo {
    async fn insert(&self, new: NewApplication) -> Result<Application, StoreError> {
        let sql = format!(
            r#"
            INSERT INTO applications
                (job_name, company_name, website_url, date_applied, contact_name,
                 contact_phone, contact_email, interview_date, status, notes, user_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {COLUMNS}
            "#
        );
        sqlx::query_as::<_, Application>(&sql)
            .bind(new.job_name)
            .bind(new.company_name)
            .bind(new.website_url)
            .bind(new.date_applied)
            .bind(new.contact_name)
            .bind(new.contact_phone)
            .bind(new.contact_email)
            .bind(new.interview_date)
            .bind(new.status)
            .bind(new.notes)
            .bind(new.user_id)
            .fetch_one(&self.db)
            .await
            .map_err(StoreError::from_sqlx)
    }

    async fn get_by_id(&self, id: i32) -> Result<Option<Application>, StoreError> {
        let sql = format!("SELECT {COLUMNS} FROM applications WHERE id = $1");
        sqlx::query_as::<_, Application>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .map_err(StoreError::from_sqlx)
    }

    async fn get_by_owner(&self, user_id: i32) -> Result<Vec<Application>, StoreError> {
        let sql = format!("SELECT {COLUMNS} FROM applications WHERE user_id = $1 ORDER BY id");
        sqlx::query_as::<_, Application>(&sql)
            .bind(user_id)
            .fetch_all(&self.db)
            .await
            .map_err(StoreError::from_sqlx)
    }

    async fn update(
        &self,
        id: i32,
        changes: ApplicationChanges,
    ) -> Result<Option<Application>, StoreError> {
        let sql = format!(
            r#"
            UPDATE applications SET
                job_name       = COALESCE($2, job_name),
                company_name   = COALESCE($3, company_name),
                website_url    = COALESCE($4, website_url),
                date_applied   = COALESCE($5, date_applied),
                contact_name   = COALESCE($6, contact_name),
                contact_phone  = COALESCE($7, contact_phone),
                contact_email  = COALESCE($8, contact_email),
                interview_date = COALESCE($9, interview_date),
                status         = COALESCE($10, status),
                notes          = COALESCE($11, notes)
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        );
        sqlx::query_as::<_, Application>(&sql)
            .bind(id)
            .bind(changes.job_name)
            .bind(changes.company_name)
            .bind(changes.website_url)
            .bind(changes.date_applied)
            .bind(changes.contact_name)
            .bind(changes.contact_phone)
            .bind(changes.contact_email)
            .bind(changes.interview_date)
            .bind(changes.status)
            .bind(changes.notes)
            .fetch_optional(&self.db)
            .await
            .map_err(StoreError::from_sqlx)
    }

    async fn delete(&self, id: i32) -> Result<u64, StoreError> {
        let res = sqlx::query("DELETE FROM applications WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .map_err(StoreError::from_sqlx)?;
        Ok(res.rows_affected())
    }
}
