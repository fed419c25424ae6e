use std::sync::Arc;
use crate::domain::{
    models::{account::Account, auth::{Claims, RefreshTokenRecord, TokenResponse}},
    ports::AuthRepository
};
use crate::error::{AppError, OAuthError};
use crate::config::Config;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;
use chrono::{Utc, Duration};
use rand::{distributions::Alphanumeric, Rng};
use sha2::{Sha256, Digest};
use subtle::ConstantTimeEq;
use tracing::warn;

pub const TOKEN_AUDIENCE: &str = "event-registry";
pub const DEFAULT_SCOPE: &str = "read write";

pub struct AuthService {
    repo: Arc<dyn AuthRepository>,
    config: Config,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl AuthService {
    pub fn new(repo: Arc<dyn AuthRepository>, config: Config) -> Result<Self, AppError> {
        let encoding_key = EncodingKey::from_ed_pem(config.jwt_secret_key.as_bytes())
            .map_err(|e| AppError::Config(format!("Invalid JWT private key PEM: {}", e)))?;
        let decoding_key = DecodingKey::from_ed_pem(config.jwt_public_key.as_bytes())
            .map_err(|e| AppError::Config(format!("Invalid JWT public key PEM: {}", e)))?;

        Ok(Self { repo, config, encoding_key, decoding_key })
    }

    pub fn authenticate_client(&self, client_id: &str, client_secret: &str) -> bool {
        let id_matches: bool = client_id.as_bytes().ct_eq(self.config.oauth_client_id.as_bytes()).into();
        let secret_matches: bool = client_secret.as_bytes().ct_eq(self.config.oauth_client_secret.as_bytes()).into();
        id_matches & secret_matches
    }

    /// Password grant: starts a new refresh token family.
    pub async fn issue(&self, account: &Account, client_id: &str) -> Result<TokenResponse, AppError> {
        self.issue_token_pair(account, client_id, Uuid::new_v4(), 1).await
    }

    /// Looks up a refresh token without consuming it.
    pub async fn find_refresh_token(&self, raw_refresh_token: &str) -> Result<RefreshTokenRecord, AppError> {
        let token_hash = self.hash_token(raw_refresh_token);
        self.repo.find_refresh_token(&token_hash).await?
            .ok_or_else(|| OAuthError::invalid_grant("Invalid refresh token").into())
    }

    /// Refresh grant: consumes the token found by `find_refresh_token` and
    /// issues the next generation of the same family. A token that is gone
    /// by the time it is consumed was redeemed concurrently, and the whole
    /// family is revoked.
    pub async fn refresh(&self, found: &RefreshTokenRecord, account: &Account, client_id: &str) -> Result<TokenResponse, AppError> {
        let Some(record) = self.repo.consume_refresh_token(&found.token_hash).await? else {
            warn!("Refresh token of family {} redeemed twice, revoking family", found.family_id);
            self.repo.delete_refresh_family(found.family_id).await?;
            return Err(OAuthError::invalid_grant("Invalid refresh token").into());
        };

        if record.client_id != client_id {
            warn!("Refresh token presented by foreign client {}", client_id);
            self.repo.delete_refresh_family(record.family_id).await?;
            return Err(OAuthError::invalid_grant("Invalid refresh token").into());
        }

        if record.expires_at < Utc::now() {
            return Err(OAuthError::invalid_grant("Refresh token expired").into());
        }

        self.issue_token_pair(account, client_id, record.family_id, record.generation_id + 1).await
    }

    pub fn verify_access_token(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::new(Algorithm::EdDSA);
        validation.set_audience(&[TOKEN_AUDIENCE]);
        validation.set_issuer(&[self.config.auth_issuer.as_str()]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|_| AppError::Unauthorized)
    }

    async fn issue_token_pair(&self, account: &Account, client_id: &str, family_id: Uuid, generation_id: i32) -> Result<TokenResponse, AppError> {
        let now = Utc::now();
        let validity = self.config.access_token_validity_secs;
        let exp = (now + Duration::seconds(validity)).timestamp() as usize;

        let claims = Claims {
            iss: self.config.auth_issuer.clone(),
            sub: account.id.to_string(),
            aud: TOKEN_AUDIENCE.to_string(),
            exp,
            iat: now.timestamp() as usize,
            jti: Uuid::new_v4().to_string(),
            client_id: client_id.to_string(),
            scope: DEFAULT_SCOPE.to_string(),
            user_name: account.email.clone(),
            authorities: account.roles.iter().map(|r| r.authority()).collect(),
        };

        let access_token = encode(&Header::new(Algorithm::EdDSA), &claims, &self.encoding_key)
            .map_err(|e| {
                tracing::error!("JWT encoding failed: {}", e);
                AppError::Internal
            })?;

        let refresh_token: String = rand::thread_rng().sample_iter(&Alphanumeric).take(64).map(char::from).collect();

        let refresh_record = RefreshTokenRecord {
            token_hash: self.hash_token(&refresh_token),
            account_id: account.id,
            client_id: client_id.to_string(),
            family_id,
            generation_id,
            expires_at: now + Duration::seconds(self.config.refresh_token_validity_secs),
            created_at: now,
        };

        self.repo.create_refresh_token(&refresh_record).await?;

        Ok(TokenResponse {
            access_token,
            token_type: "bearer",
            refresh_token,
            expires_in: validity,
            scope: DEFAULT_SCOPE.to_string(),
        })
    }

    pub fn hash_token(&self, token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        hex::encode(hasher.finalize())
    }
}
