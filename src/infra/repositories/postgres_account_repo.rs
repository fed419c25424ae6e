use crate::domain::{models::account::Account, ports::AccountRepository};
use crate::error::AppError;
use crate::infra::repositories::sqlite_account_repo::parse_roles;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresAccountRepo {
    pool: PgPool,
}

impl PostgresAccountRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_roles(&self, account: Option<Account>) -> Result<Option<Account>, AppError> {
        let Some(mut account) = account else {
            return Ok(None);
        };

        let rows: Vec<(String,)> = sqlx::query_as("SELECT role FROM account_roles WHERE account_id = $1")
            .bind(account.id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;

        account.roles = parse_roles(rows);
        Ok(Some(account))
    }
}

#[async_trait]
impl AccountRepository for PostgresAccountRepo {
    async fn create(&self, account: &Account) -> Result<Account, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let mut created = sqlx::query_as::<_, Account>(
            "INSERT INTO accounts (email, password_hash, created_at) VALUES ($1, $2, $3) RETURNING id, email, password_hash, created_at",
        )
            .bind(&account.email)
            .bind(&account.password_hash)
            .bind(account.created_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        for role in &account.roles {
            sqlx::query("INSERT INTO account_roles (account_id, role) VALUES ($1, $2)")
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
            "SELECT id, email, password_hash, created_at FROM accounts WHERE email = $1",
        )
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?;

        self.load_roles(account).await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Account>, AppError> {
        let account = sqlx::query_as::<_, Account>(
            "SELECT id, email, password_hash, created_at FROM accounts WHERE id = $1",
        )
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?;

        self.load_roles(account).await
    }
}
