//! Authorization context extractor for Axum

use async_trait::async_trait;
use axum::{
    extract::{Extension, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::common::{normalize_email, safe_email_log, ApiError, AppState};
use crate::users::services::UsersService;
use crate::users::Role;

/// Who is calling, built once per request from the verified token.
///
/// The role is resolved here and threaded into handlers; nothing downstream
/// queries the users table for authorization again.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthContext {
    pub subject_id: String,
    pub email: String,
    pub role: Role,
    /// Demo account: may read, may not perform admin mutations or role changes
    pub restricted: bool,
}

impl AuthContext {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.is_admin() {
            Ok(())
        } else {
            warn!(email = %safe_email_log(&self.email), "Admin privileges required");
            Err(ApiError::Forbidden("Admin privileges required".to_string()))
        }
    }

    /// Caller must be the provider that listed the car
    pub fn require_owner(&self, provider_email: &str) -> Result<(), ApiError> {
        if normalize_email(provider_email) == self.email {
            Ok(())
        } else {
            warn!(
                email = %safe_email_log(&self.email),
                "Ownership check failed"
            );
            Err(ApiError::Forbidden(
                "You are not authorized to modify this car".to_string(),
            ))
        }
    }

    pub fn require_unrestricted(&self) -> Result<(), ApiError> {
        if self.restricted {
            warn!(email = %safe_email_log(&self.email), "Demo account attempted a restricted action");
            Err(ApiError::Forbidden(
                "This is a demo account. You can only view the data, but you cannot delete or modify it."
                    .to_string(),
            ))
        } else {
            Ok(())
        }
    }
}

/// Extract the token from `Authorization: Bearer <token>`
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| ApiError::Unauthenticated("Unauthorized: No token provided".to_string()))?;

    header
        .to_str()
        .ok()
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::Unauthenticated("Unauthorized: Malformed token".to_string()))
}

/// Verify the token and resolve the caller's role
pub async fn resolve_auth_context(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<AuthContext, ApiError> {
    let (identity, dev_admin) = if state.dev_mode.is_enabled() {
        debug!("DEV MODE: identity verification bypassed");
        (state.dev_mode.dev_identity(), state.dev_mode.user_is_admin)
    } else {
        let token = bearer_token(headers).map_err(|e| {
            warn!("Authentication failed: {}", e);
            e
        })?;
        (state.identity.verify(token).await?, false)
    };

    let stored_role = UsersService::new(state.db.clone())
        .find_role(&identity.email)
        .await?
        .unwrap_or_default();

    let role = if dev_admin || state.admin_emails.contains(&identity.email) {
        Role::Admin
    } else {
        stored_role
    };

    let restricted = state.restricted_emails.contains(&identity.email);

    debug!(
        subject_id = %identity.subject_id,
        email = %safe_email_log(&identity.email),
        role = %role.as_str(),
        restricted = restricted,
        "Request authenticated"
    );

    Ok(AuthContext {
        subject_id: identity.subject_id,
        email: identity.email,
        role,
        restricted,
    })
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Extension(state_lock): Extension<Arc<RwLock<AppState>>> =
            Extension::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::InternalServer("missing app state".to_string()))?;

        let app_state = state_lock.read().await.clone();

        resolve_auth_context(&app_state, &parts.headers).await
    }
}

#[cfg(test)]
pub mod test_support {
    use super::AuthContext;
    use crate::users::Role;

    pub fn user_ctx(email: &str) -> AuthContext {
        AuthContext {
            subject_id: format!("sub-{}", email),
            email: email.to_string(),
            role: Role::User,
            restricted: false,
        }
    }

    pub fn admin_ctx(email: &str) -> AuthContext {
        AuthContext {
            role: Role::Admin,
            ..user_ctx(email)
        }
    }
}
