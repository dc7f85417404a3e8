//! Admin gate.
//!
//! A login with the configured email/password pair yields an opaque session token. Editing
//! routes require that token. Credentials are compared in constant time to mitigate timing
//! attacks. Sessions have no expiry and do not survive a restart.

use std::collections::HashSet;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use subtle::ConstantTimeEq;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::config::AdminCredentials;
use crate::errors::AppError;
use crate::AppState;

/// Header carrying the admin session token.
pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// Shown when the email/password pair does not match.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Credenciais inválidas. Tente novamente.";

/// Issued admin tokens.
pub struct AdminGate {
    credentials: Option<AdminCredentials>,
    sessions: RwLock<HashSet<String>>,
}

impl AdminGate {
    pub fn new(credentials: Option<AdminCredentials>) -> Self {
        Self {
            credentials,
            sessions: RwLock::new(HashSet::new()),
        }
    }

    /// Exchange a matching email/password pair for a new admin token.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, AppError> {
        let Some(credentials) = &self.credentials else {
            tracing::warn!("Admin login attempted but no admin credentials are configured");
            return Err(AppError::InvalidCredentials(
                INVALID_CREDENTIALS_MESSAGE.to_string(),
            ));
        };

        // Evaluate both comparisons so timing does not reveal which field matched.
        let email_ok = constant_time_compare(email, &credentials.email);
        let password_ok = constant_time_compare(password, credentials.password.expose());
        if !(email_ok & password_ok) {
            tracing::warn!("Admin login rejected");
            return Err(AppError::InvalidCredentials(
                INVALID_CREDENTIALS_MESSAGE.to_string(),
            ));
        }

        let token = Uuid::new_v4().to_string();
        self.sessions.write().await.insert(token.clone());
        tracing::info!("Admin session opened");
        Ok(token)
    }

    /// Revoke a token. Returns whether it was active.
    pub async fn logout(&self, token: &str) -> bool {
        self.sessions.write().await.remove(token)
    }

    pub async fn is_admin(&self, token: Option<&str>) -> bool {
        match token {
            Some(token) => self.sessions.read().await.contains(token),
            None => false,
        }
    }
}

/// Pull the admin token from `x-admin-token` or a bearer `Authorization` header.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .or_else(|| {
            headers
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.strip_prefix("Bearer "))
        })
        .map(|s| s.trim().to_string())
}

/// Middleware guarding the editing routes.
pub async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = token_from_headers(request.headers());
    if state.admin.is_admin(token.as_deref()).await {
        Ok(next.run(request).await)
    } else {
        Err(AppError::Unauthorized(
            "Admin session required".to_string(),
        ))
    }
}

/// Perform constant-time string comparison.
fn constant_time_compare(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}
