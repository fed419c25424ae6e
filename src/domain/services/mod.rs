pub mod account_service;
pub mod auth_service;
pub mod event_validator;
