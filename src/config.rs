use std::env;
use std::str::FromStr;
use crate::error::AppError;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret_key: String, // Private key (PEM)
    pub jwt_public_key: String, // Public key (PEM)
    pub auth_issuer: String,
    pub oauth_client_id: String,
    pub oauth_client_secret: String,
    pub access_token_validity_secs: i64,
    pub refresh_token_validity_secs: i64,
    pub seed_accounts: SeedAccounts,
}

/// Accounts created on startup when missing.
#[derive(Clone)]
pub struct SeedAccounts {
    pub admin_username: String,
    pub admin_password: String,
    pub user_username: String,
    pub user_password: String,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            database_url: required("DATABASE_URL")?,
            port: parsed_or("PORT", 3000)?,
            jwt_secret_key: required("JWT_SECRET_KEY")?,
            jwt_public_key: required("JWT_PUBLIC_KEY")?,
            auth_issuer: env::var("AUTH_ISSUER").unwrap_or_else(|_| "https://api.event-registry.local".to_string()),
            oauth_client_id: env::var("OAUTH_CLIENT_ID").unwrap_or_else(|_| "myApp".to_string()),
            oauth_client_secret: env::var("OAUTH_CLIENT_SECRET").unwrap_or_else(|_| "pass".to_string()),
            access_token_validity_secs: parsed_or("ACCESS_TOKEN_VALIDITY_SECONDS", 10 * 60)?,
            refresh_token_validity_secs: parsed_or("REFRESH_TOKEN_VALIDITY_SECONDS", 6 * 10 * 60)?,
            seed_accounts: SeedAccounts {
                admin_username: env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin@email.com".to_string()),
                admin_password: env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin".to_string()),
                user_username: env::var("USER_USERNAME").unwrap_or_else(|_| "user@email.com".to_string()),
                user_password: env::var("USER_PASSWORD").unwrap_or_else(|_| "user".to_string()),
            },
        })
    }
}

fn required(key: &str) -> Result<String, AppError> {
    env::var(key).map_err(|_| AppError::Config(format!("{} must be set", key)))
}

fn parsed_or<T: FromStr>(key: &str, default: T) -> Result<T, AppError> {
    match env::var(key) {
        Ok(raw) => raw.parse().map_err(|_| AppError::Config(format!("{} must be a number", key))),
        Err(_) => Ok(default),
    }
}
