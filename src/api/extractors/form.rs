use axum::{
    extract::{FromRequest, Request},
    response::{IntoResponse, Response},
    Form,
};
use serde::de::DeserializeOwned;
use tracing::debug;
use crate::error::{AppError, OAuthError};

/// Form body for the token endpoint. Any rejection (wrong content type,
/// undecodable body) becomes an RFC 6749 `invalid_request`.
pub struct OAuthForm<T>(pub T);

impl<T, S> FromRequest<S> for OAuthForm<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Form::<T>::from_request(req, state).await {
            Ok(Form(value)) => Ok(OAuthForm(value)),
            Err(rejection) => {
                debug!("Rejected token request body: {}", rejection.body_text());
                Err(AppError::from(OAuthError::invalid_request(rejection.body_text())).into_response())
            }
        }
    }
}
