use axum::{
    extract::{FromRequestParts, FromRef},
    http::{request::Parts, StatusCode},
};
use crate::state::AppState;
use super::auth::{bearer_token, CurrentAccount};
use std::sync::Arc;
use tracing::debug;

/// Anonymous access allowed; a missing or invalid token yields `None`.
pub struct MaybeAuthAccount(pub Option<CurrentAccount>);

impl<S> FromRequestParts<S> for MaybeAuthAccount
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(parts) else {
            return Ok(MaybeAuthAccount(None));
        };

        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);

        let claims = match app_state.auth_service.verify_access_token(token) {
            Ok(claims) => claims,
            Err(_) => {
                // Invalid token (expired, bad signature) -> Treat as guest
                debug!("MaybeAuth: ignoring invalid bearer token");
                return Ok(MaybeAuthAccount(None));
            }
        };

        Ok(MaybeAuthAccount(CurrentAccount::from_claims(claims)))
    }
}
