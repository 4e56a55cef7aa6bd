/// The auth gate in front of protected routes
///
/// Every protected request passes through [`authenticate`]: extract the
/// bearer credential, verify its signature, then check the session row it
/// was issued with. The session row is the revocation authority: a
/// cryptographically valid token is still rejected once its session has
/// been revoked or has expired.
///
/// Public paths (root, health, auth routes) never reach this code; the
/// router groups them outside the layer.
///
/// # Request Extensions
///
/// On success the API layer inserts an [`AuthContext`] into the request
/// extensions, which handlers extract with Axum's `Extension` extractor.

use axum::http::{header, HeaderMap};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use super::jwt::{validate_token, JwtError};
use crate::models::session::Session;

/// Identity attached to a request after it clears the gate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID (from the credential's `sub` claim)
    pub user_id: Uuid,

    /// Email embedded at sign-in time
    pub email: String,
}

/// Error type for the auth gate
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No Authorization header on the request
    #[error("Missing authorization header")]
    MissingCredentials,

    /// Authorization header is not `Bearer <token>`
    #[error("Invalid authorization header format: {0}")]
    InvalidFormat(String),

    /// Credential failed signature or issuer validation
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// No active session backs the credential
    #[error("Session expired! Please log in.")]
    SessionExpired,

    /// Session lookup failed
    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// Extracts the bearer token from request headers
///
/// # Errors
///
/// - `AuthError::MissingCredentials` when the header is absent
/// - `AuthError::InvalidFormat` when it is not a `Bearer <token>` value
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingCredentials)?
        .to_str()
        .map_err(|_| AuthError::InvalidFormat("Header is not valid UTF-8".to_string()))?;

    value
        .strip_prefix("Bearer ")
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))
}

/// Validates a request's credential against the session store
///
/// The full gate:
///
/// 1. Extract the bearer token.
/// 2. Verify the credential. A decode failure is an explicit auth failure,
///    never a null identity that proceeds.
/// 3. Look up the session by the exact token string. A missing row is
///    treated as expired. A row that is no longer active (flag cleared,
///    soft-deleted, or past its expiry) is lazily revoked and reported as
///    expired.
/// 4. Return the caller's identity.
pub async fn authenticate(
    pool: &PgPool,
    secret: &str,
    headers: &HeaderMap,
) -> Result<AuthContext, AuthError> {
    let token = bearer_token(headers)?;

    let claims = match validate_token(token, secret) {
        Ok(claims) => claims,
        Err(JwtError::Expired) => {
            // The session row carries the same expiry as the credential;
            // flip it before rejecting so the store reflects reality.
            revoke_if_stale(pool, token).await?;
            return Err(AuthError::SessionExpired);
        }
        Err(e) => return Err(AuthError::InvalidToken(e.to_string())),
    };

    let session = Session::find_by_token(pool, token)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

    let Some(session) = session else {
        return Err(AuthError::SessionExpired);
    };

    if !session.is_active() {
        if session.active && !session.deleted {
            debug!(session_id = %session.id, "Lazily revoking expired session");
            Session::revoke(pool, session.id)
                .await
                .map_err(|e| AuthError::DatabaseError(e.to_string()))?;
        }
        return Err(AuthError::SessionExpired);
    }

    Ok(AuthContext {
        user_id: claims.sub,
        email: claims.email,
    })
}

/// Flips a session that still looks active but whose token has expired
async fn revoke_if_stale(pool: &PgPool, token: &str) -> Result<(), AuthError> {
    let session = Session::find_by_token(pool, token)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

    if let Some(session) = session {
        if session.active && !session.deleted {
            debug!(session_id = %session.id, "Lazily revoking expired session");
            Session::revoke(pool, session.id)
                .await
                .map_err(|e| AuthError::DatabaseError(e.to_string()))?;
        }
    }

    Ok(())
}
