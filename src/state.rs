use std::sync::Arc;
use crate::domain::ports::{AccountRepository, EventRepository, AuthRepository};
use crate::domain::services::{
    account_service::AccountService,
    auth_service::AuthService,
    event_validator::EventValidator,
};
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub event_repo: Arc<dyn EventRepository>,
    pub account_service: Arc<AccountService>,
    pub auth_service: Arc<AuthService>,
    pub event_validator: Arc<EventValidator>,
}

impl AppState {
    /// Wires services on top of the given repositories.
    pub fn new(
        config: Config,
        account_repo: Arc<dyn AccountRepository>,
        event_repo: Arc<dyn EventRepository>,
        auth_repo: Arc<dyn AuthRepository>,
    ) -> Result<Self, crate::error::AppError> {
        let account_service = Arc::new(AccountService::new(account_repo));
        let auth_service = Arc::new(AuthService::new(auth_repo, config.clone())?);

        Ok(Self {
            config,
            event_repo,
            account_service,
            auth_service,
            event_validator: Arc::new(EventValidator),
        })
    }
}
