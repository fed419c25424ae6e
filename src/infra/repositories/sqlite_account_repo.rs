use crate::domain::{models::account::{Account, AccountRole}, ports::AccountRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;
use std::collections::BTreeSet;
use tracing::warn;

pub struct SqliteAccountRepo {
    pool: SqlitePool,
}

impl SqliteAccountRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn load_roles(&self, account: Option<Account>) -> Result<Option<Account>, AppError> {
        let Some(mut account) = account else {
            return Ok(None);
        };

        let rows: Vec<(String,)> = sqlx::query_as("SELECT role FROM account_roles WHERE account_id = ?")
            .bind(account.id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;

        account.roles = parse_roles(rows);
        Ok(Some(account))
    }
}

pub(crate) fn parse_roles(rows: Vec<(String,)>) -> BTreeSet<AccountRole> {
    rows.into_iter()
        .filter_map(|(role,)| match role.parse() {
            Ok(r) => Some(r),
            Err(e) => {
                warn!("Skipping stored role: {}", e);
                None
            }
        })
        .collect()
}

#[async_trait]
impl AccountRepository for SqliteAccountRepo {
    async fn create(&self, account: &Account) -> Result<Account, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let mut created = sqlx::query_as::<_, Account>(
            "INSERT INTO accounts (email, password_hash, created_at) VALUES (?, ?, ?) RETURNING id, email, password_hash, created_at",
        )
            .bind(&account.email)
            .bind(&account.password_hash)
            .bind(account.created_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        for role in &account.roles {
            sqlx::query("INSERT INTO account_roles (account_id, role) VALUES (?, ?)")
                .bind(created.id)
                .bind(role.as_str())
                .execute(&mut *tx)
                .await
                .map_err(AppError::Database)?;
        }

        tx.commit().await.map_err(AppError::Database)?;

        created.roles = account.roles.clone();
        Ok(created)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AppError> {
        let account = sqlx::query_as::<_, Account>(
            "SELECT id, email, password_hash, created_at FROM accounts WHERE email = ?",
        )
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?;

        self.load_roles(account).await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Account>, AppError> {
        let account = sqlx::query_as::<_, Account>(
            "SELECT id, email, password_hash, created_at FROM accounts WHERE id = ?",
        )
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?;

        self.load_roles(account).await
    }
}
