use crate::domain::{models::auth::RefreshTokenRecord, ports::AuthRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

const REFRESH_TOKEN_COLUMNS: &str =
    "token_hash, account_id, client_id, family_id, generation_id, expires_at, created_at";

pub struct SqliteAuthRepo {
    pool: SqlitePool,
}

impl SqliteAuthRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthRepository for SqliteAuthRepo {
    async fn create_refresh_token(&self, record: &RefreshTokenRecord) -> Result<(), AppError> {
        let sql = format!("INSERT INTO refresh_tokens ({}) VALUES (?, ?, ?, ?, ?, ?, ?)", REFRESH_TOKEN_COLUMNS);
        sqlx::query(&sql)
            .bind(&record.token_hash)
            .bind(record.account_id)
            .bind(&record.client_id)
            .bind(record.family_id)
            .bind(record.generation_id)
            .bind(record.expires_at)
            .bind(record.created_at)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }

    async fn find_refresh_token(&self, token_hash: &str) -> Result<Option<RefreshTokenRecord>, AppError> {
        let sql = format!("SELECT {} FROM refresh_tokens WHERE token_hash = ?", REFRESH_TOKEN_COLUMNS);
        sqlx::query_as::<_, RefreshTokenRecord>(&sql)
            .bind(token_hash)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn consume_refresh_token(&self, token_hash: &str) -> Result<Option<RefreshTokenRecord>, AppError> {
        // Single statement: concurrent callers race on the row lock, only one gets it back.
        let sql = format!("DELETE FROM refresh_tokens WHERE token_hash = ? RETURNING {}", REFRESH_TOKEN_COLUMNS);
        sqlx::query_as::<_, RefreshTokenRecord>(&sql)
            .bind(token_hash)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete_refresh_family(&self, family_id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE family_id = ?")
            .bind(family_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        tracing::debug!("Revoked {} refresh tokens of family {}", result.rows_affected(), family_id);
        Ok(())
    }
}
