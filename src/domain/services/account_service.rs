use std::sync::Arc;
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use rand::rngs::OsRng;
use tracing::{debug, info};
use crate::config::SeedAccounts;
use crate::domain::{
    models::account::{Account, AccountRole, NewAccount},
    ports::AccountRepository,
};
use crate::error::AppError;

pub struct AccountService {
    repo: Arc<dyn AccountRepository>,
}

impl AccountService {
    pub fn new(repo: Arc<dyn AccountRepository>) -> Self {
        Self { repo }
    }

    /// Hashes the plain password and persists the account with its roles.
    pub async fn save_account(&self, account: NewAccount) -> Result<Account, AppError> {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(account.password.as_bytes(), &salt)
            .map_err(|e| AppError::InternalWithMsg(format!("Password hashing failed: {}", e)))?
            .to_string();

        let created = self.repo.create(&Account {
            id: 0,
            email: account.email,
            password_hash,
            roles: account.roles,
            created_at: Utc::now(),
        }).await?;

        info!("Account saved: {}", created.id);
        Ok(created)
    }

    pub async fn load_user_by_username(&self, username: &str) -> Result<Account, AppError> {
        self.repo.find_by_email(username).await?
            .ok_or_else(|| AppError::UsernameNotFound(username.to_string()))
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Account>, AppError> {
        self.repo.find_by_id(id).await
    }

    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Account, AppError> {
        let account = self.load_user_by_username(username).await?;
        if !self.password_matches(password, &account.password_hash) {
            debug!("Password mismatch for account {}", account.id);
            return Err(AppError::BadCredentials);
        }
        Ok(account)
    }

    pub fn password_matches(&self, raw_password: &str, password_hash: &str) -> bool {
        PasswordHash::new(password_hash)
            .map(|parsed| Argon2::default().verify_password(raw_password.as_bytes(), &parsed).is_ok())
            .unwrap_or(false)
    }

    /// Creates the configured admin and user accounts unless they already exist.
    pub async fn seed_accounts(&self, seeds: &SeedAccounts) -> Result<(), AppError> {
        let defaults = [
            (&seeds.admin_username, &seeds.admin_password, vec![AccountRole::Admin, AccountRole::User]),
            (&seeds.user_username, &seeds.user_password, vec![AccountRole::User]),
        ];

        for (username, password, roles) in defaults {
            if self.repo.find_by_email(username).await?.is_some() {
                debug!("Seed account already present: {}", username);
                continue;
            }
            self.save_account(NewAccount::new(username.as_str(), password.as_str(), roles)).await?;
        }
        Ok(())
    }
}
