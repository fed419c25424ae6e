pub mod sqlite_account_repo;
pub mod sqlite_event_repo;
pub mod sqlite_auth_repo;

pub mod postgres_account_repo;
pub mod postgres_event_repo;
pub mod postgres_auth_repo;
