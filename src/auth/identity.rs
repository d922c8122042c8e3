//! Identity providers that turn a bearer token into a verified `(subject, email)` pair

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use tracing::{debug, error, warn};

use super::models::{Claims, FirebaseLookupRequest, FirebaseLookupResponse, VerifiedIdentity};
use crate::common::config::{AppConfig, IdentityProviderKind};
use crate::common::{normalize_email, safe_email_log, ApiError};

const FIREBASE_LOOKUP_URL: &str = "https://identitytoolkit.googleapis.com/v1/accounts:lookup";

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Verify a bare token (no `Bearer ` prefix)
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, ApiError>;
}

/// Verifies Firebase ID tokens with the Identity Toolkit `accounts:lookup` call
pub struct FirebaseIdentityProvider {
    http: Client,
    api_key: String,
    lookup_url: String,
}

impl FirebaseIdentityProvider {
    pub fn new(http: Client, api_key: String) -> Self {
        Self::with_lookup_url(http, api_key, FIREBASE_LOOKUP_URL.to_string())
    }

    pub fn with_lookup_url(http: Client, api_key: String, lookup_url: String) -> Self {
        Self {
            http,
            api_key,
            lookup_url,
        }
    }
}

#[async_trait]
impl IdentityProvider for FirebaseIdentityProvider {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, ApiError> {
        debug!("Verifying ID token with identity provider");

        let resp = self
            .http
            .post(&self.lookup_url)
            .query(&[("key", self.api_key.as_str())])
            .json(&FirebaseLookupRequest { id_token: token })
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "HTTP error contacting identity provider");
                ApiError::Upstream("identity provider unavailable".to_string())
            })?;

        let status = resp.status();
        if status == StatusCode::BAD_REQUEST || status == StatusCode::UNAUTHORIZED {
            warn!(http_status = %status, "Identity provider rejected token");
            return Err(ApiError::Unauthenticated("Unauthorized: Invalid token".to_string()));
        }
        if !status.is_success() {
            error!(http_status = %status, "Identity provider returned error status");
            return Err(ApiError::Upstream(
                "identity provider verification failed".to_string(),
            ));
        }

        let body: FirebaseLookupResponse = resp.json().await.map_err(|e| {
            error!(error = %e, "Malformed identity provider response");
            ApiError::Upstream("malformed identity provider response".to_string())
        })?;

        let account = body
            .users
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::Unauthenticated("Unauthorized: Invalid token".to_string()))?;

        if account.disabled {
            warn!(subject_id = %account.local_id, "Token belongs to a disabled account");
            return Err(ApiError::Unauthenticated("Unauthorized: account disabled".to_string()));
        }

        let email = account
            .email
            .as_deref()
            .map(normalize_email)
            .filter(|e| !e.is_empty())
            .ok_or_else(|| {
                ApiError::Unauthenticated("Unauthorized: token has no email".to_string())
            })?;

        debug!(
            subject_id = %account.local_id,
            email = %safe_email_log(&email),
            "Identity verified"
        );

        Ok(VerifiedIdentity {
            subject_id: account.local_id,
            email,
        })
    }
}

/// Verifies HS256 tokens signed with a shared secret
pub struct JwtIdentityProvider {
    secret: String,
}

impl JwtIdentityProvider {
    pub fn new(secret: String) -> Self {
        Self { secret }
    }

    /// Sign a token for `subject`/`email`, valid for `ttl`
    pub fn issue_token(&self, subject: &str, email: &str, ttl: Duration) -> Result<String, ApiError> {
        let exp = (Utc::now() + ttl).timestamp().max(0) as usize;
        let claims = Claims {
            sub: subject.to_string(),
            email: normalize_email(email),
            exp,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| ApiError::InternalServer(format!("failed to sign token: {}", e)))
    }
}

#[async_trait]
impl IdentityProvider for JwtIdentityProvider {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, ApiError> {
        let decoded = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|e| {
            warn!(error = %e, "JWT token validation failed");
            ApiError::Unauthenticated("Unauthorized: Invalid token".to_string())
        })?;

        let email = normalize_email(&decoded.claims.email);
        if email.is_empty() {
            return Err(ApiError::Unauthenticated(
                "Unauthorized: token has no email".to_string(),
            ));
        }

        Ok(VerifiedIdentity {
            subject_id: decoded.claims.sub,
            email,
        })
    }
}

/// Build the provider selected by `IDENTITY_PROVIDER`
pub fn build_identity_provider(
    config: &AppConfig,
    http: Client,
) -> anyhow::Result<Arc<dyn IdentityProvider>> {
    let provider: Arc<dyn IdentityProvider> = match config.identity_provider {
        IdentityProviderKind::Firebase => {
            let api_key = config
                .firebase_api_key
                .clone()
                .ok_or_else(|| anyhow::anyhow!("FIREBASE_API_KEY is not set"))?;
            Arc::new(FirebaseIdentityProvider::new(http, api_key))
        }
        IdentityProviderKind::Jwt => {
            let secret = config
                .jwt_secret
                .clone()
                .ok_or_else(|| anyhow::anyhow!("JWT_SECRET is not set"))?;
            Arc::new(JwtIdentityProvider::new(secret))
        }
    };

    Ok(provider)
}
