pub mod event;
pub mod health;
pub mod index;
pub mod oauth;
