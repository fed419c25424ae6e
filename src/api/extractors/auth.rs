use axum::{
    extract::{FromRequestParts, FromRef},
    http::{header, request::Parts, StatusCode},
};
use crate::state::AppState;
use crate::domain::models::auth::Claims;
use std::sync::Arc;
use tracing::Span;

/// The account a bearer token was issued to.
#[derive(Debug, Clone)]
pub struct CurrentAccount {
    pub id: i64,
}

impl CurrentAccount {
    pub(crate) fn from_claims(claims: Claims) -> Option<Self> {
        let id = claims.sub.parse().ok()?;
        Some(Self { id })
    }
}

pub(crate) fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() {
        Some(token.trim())
    } else {
        None
    }
}

/// Requires a valid bearer token.
pub struct AuthAccount(pub CurrentAccount);

impl<S> FromRequestParts<S> for AuthAccount
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(StatusCode::UNAUTHORIZED)?;

        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);

        let claims = app_state.auth_service.verify_access_token(token)
            .map_err(|_| StatusCode::UNAUTHORIZED)?;

        let account = CurrentAccount::from_claims(claims).ok_or(StatusCode::UNAUTHORIZED)?;

        Span::current().record("account_id", account.id);

        Ok(AuthAccount(account))
    }
}
