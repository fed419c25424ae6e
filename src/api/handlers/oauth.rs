use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::IntoResponse,
    Json,
};
use base64::{Engine as _, engine::general_purpose};
use crate::state::AppState;
use crate::api::dtos::requests::TokenRequest;
use crate::api::extractors::form::OAuthForm;
use crate::domain::models::auth::TokenResponse;
use crate::error::{AppError, OAuthError};
use std::sync::Arc;
use tracing::{info, warn};

/// Client credentials from HTTP Basic, falling back to the form body.
fn client_credentials(headers: &HeaderMap, req: &TokenRequest) -> Option<(String, String)> {
    if let Some(value) = headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        let encoded = value.strip_prefix("Basic ")?;
        let decoded = general_purpose::STANDARD.decode(encoded.trim()).ok()?;
        let creds = String::from_utf8(decoded).ok()?;
        let (id, secret) = creds.split_once(':')?;
        return Some((id.to_string(), secret.to_string()));
    }

    Some((req.client_id.clone()?, req.client_secret.clone().unwrap_or_default()))
}

pub async fn token(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    OAuthForm(req): OAuthForm<TokenRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (client_id, client_secret) = client_credentials(&headers, &req)
        .ok_or_else(OAuthError::invalid_client)?;

    if !state.auth_service.authenticate_client(&client_id, &client_secret) {
        warn!("Rejected token request from client {}", client_id);
        return Err(OAuthError::invalid_client().into());
    }

    let grant_type = req.grant_type.as_deref()
        .ok_or_else(|| OAuthError::invalid_request("Missing grant type"))?;

    let response = match grant_type {
        "password" => password_grant(&state, &client_id, &req).await?,
        "refresh_token" => refresh_token_grant(&state, &client_id, &req).await?,
        other => return Err(OAuthError::unsupported_grant_type(other).into()),
    };

    Ok(([(header::CACHE_CONTROL, "no-store")], Json(response)))
}

async fn password_grant(state: &AppState, client_id: &str, req: &TokenRequest) -> Result<TokenResponse, AppError> {
    let (Some(username), Some(password)) = (req.username.as_deref(), req.password.as_deref()) else {
        return Err(OAuthError::invalid_request("username and password are required").into());
    };

    let account = match state.account_service.authenticate(username, password).await {
        Ok(account) => account,
        Err(AppError::UsernameNotFound(_)) | Err(AppError::BadCredentials) => {
            return Err(OAuthError::invalid_grant("Bad credentials").into());
        }
        Err(e) => return Err(e),
    };

    let response = state.auth_service.issue(&account, client_id).await?;
    info!("Issued access token for account {} to client {}", account.id, client_id);
    Ok(response)
}

async fn refresh_token_grant(state: &AppState, client_id: &str, req: &TokenRequest) -> Result<TokenResponse, AppError> {
    let raw_token = req.refresh_token.as_deref()
        .ok_or_else(|| OAuthError::invalid_request("refresh_token is required"))?;

    let record = state.auth_service.find_refresh_token(raw_token).await?;

    let account = state.account_service.find_by_id(record.account_id).await?
        .ok_or_else(|| OAuthError::invalid_grant("Invalid refresh token"))?;

    let response = state.auth_service.refresh(&record, &account, client_id).await?;
    info!("Refreshed access token for account {}", account.id);
    Ok(response)
}
