use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::error::AppError;
use crate::state::AppState;
use crate::infra::repositories::{
    postgres_account_repo::PostgresAccountRepo, postgres_event_repo::PostgresEventRepo,
    postgres_auth_repo::PostgresAuthRepo,
    sqlite_account_repo::SqliteAccountRepo, sqlite_event_repo::SqliteEventRepo,
    sqlite_auth_repo::SqliteAuthRepo,
};

pub async fn bootstrap_state(config: &Config) -> Result<AppState, AppError> {
    let database_url = &config.database_url;

    let state = if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse()
            .map_err(|e| AppError::Config(format!("Invalid Postgres URL: {}", e)))?;
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await?;

        run_postgres_migrations(&pool).await?;
        postgres_state(config, pool)?
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .foreign_keys(true)
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await?;

        run_sqlite_migrations(&pool).await?;
        sqlite_state(config, pool)?
    };

    state.account_service.seed_accounts(&config.seed_accounts).await?;
    Ok(state)
}

pub fn sqlite_state(config: &Config, pool: SqlitePool) -> Result<AppState, AppError> {
    AppState::new(
        config.clone(),
        Arc::new(SqliteAccountRepo::new(pool.clone())),
        Arc::new(SqliteEventRepo::new(pool.clone())),
        Arc::new(SqliteAuthRepo::new(pool)),
    )
}

pub fn postgres_state(config: &Config, pool: PgPool) -> Result<AppState, AppError> {
    AppState::new(
        config.clone(),
        Arc::new(PostgresAccountRepo::new(pool.clone())),
        Arc::new(PostgresEventRepo::new(pool.clone())),
        Arc::new(PostgresAuthRepo::new(pool)),
    )
}

async fn run_postgres_migrations(pool: &PgPool) -> Result<(), AppError> {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .map_err(|e| AppError::InternalWithMsg(format!("Postgres migrations failed: {}", e)))
}

pub async fn run_sqlite_migrations(pool: &SqlitePool) -> Result<(), AppError> {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .map_err(|e| AppError::InternalWithMsg(format!("SQLite migrations failed: {}", e)))
}
