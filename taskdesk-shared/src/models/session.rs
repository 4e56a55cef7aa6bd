/// Session model and database operations
///
/// A session row records a credential issued at sign-in. The row, not the
/// signed token, is the revocation authority: logout and lazy expiry both
/// flip the row while the token string itself stays valid-looking.
///
/// A session is **active** only when `active = TRUE`, `deleted = FALSE`,
/// and `expires_at` is in the future. Any other combination is treated as
/// expired, and the auth gate revokes it lazily on the next access.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE sessions (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     email VARCHAR(255) NOT NULL,
///     token TEXT NOT NULL,
///     expires_at TIMESTAMPTZ NOT NULL,
///     active BOOLEAN NOT NULL DEFAULT TRUE,
///     deleted BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Session model representing an issued sign-in credential
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Session {
    /// Unique session ID
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    /// Email embedded at sign-in time
    pub email: String,

    /// The issued credential string (exact match on lookup)
    pub token: String,

    /// When the session stops being valid
    pub expires_at: DateTime<Utc>,

    /// Cleared on logout or lazy expiry
    pub active: bool,

    /// Soft-delete flag, set together with clearing `active`
    pub deleted: bool,

    /// When the session was created
    pub created_at: DateTime<Utc>,

    /// When the session was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new session at sign-in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSession {
    /// Owning user
    pub user_id: Uuid,

    /// User email at sign-in time
    pub email: String,

    /// The signed credential handed to the client
    pub token: String,

    /// Expiry matching the credential's embedded expiry
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Checks whether the session is active right now
    pub fn is_active(&self) -> bool {
        self.active && !self.deleted && self.expires_at > Utc::now()
    }

    /// Persists a new active session
    pub async fn create(pool: &PgPool, data: CreateSession) -> Result<Self, sqlx::Error> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO sessions (user_id, email, token, expires_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, email, token, expires_at, active, deleted,
                      created_at, updated_at
            "#,
        )
        .bind(data.user_id)
        .bind(data.email)
        .bind(data.token)
        .bind(data.expires_at)
        .fetch_one(pool)
        .await?;

        Ok(session)
    }

    /// Finds a session by its exact token string, in any state
    ///
    /// The caller decides what an inactive or expired row means; the auth
    /// gate uses this to drive lazy revocation.
    pub async fn find_by_token(pool: &PgPool, token: &str) -> Result<Option<Self>, sqlx::Error> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            SELECT id, user_id, email, token, expires_at, active, deleted,
                   created_at, updated_at
            FROM sessions
            WHERE token = $1
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(token)
        .fetch_optional(pool)
        .await?;

        Ok(session)
    }

    /// Marks a session revoked and soft-deleted
    ///
    /// Used by the auth gate when it encounters an expired-but-still-active
    /// row.
    pub async fn revoke(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            UPDATE sessions
            SET active = FALSE,
                deleted = TRUE,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, user_id, email, token, expires_at, active, deleted,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(session)
    }

    /// Revokes the active, non-deleted session matching the exact token
    ///
    /// This is the logout operation. Returns `None` when no such session
    /// exists (already revoked, expired-and-flipped, or never issued), which
    /// the handler reports as not-found.
    pub async fn revoke_active_by_token(
        pool: &PgPool,
        token: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            UPDATE sessions
            SET active = FALSE,
                deleted = TRUE,
                updated_at = NOW()
            WHERE token = $1 AND active = TRUE AND deleted = FALSE
            RETURNING id, user_id, email, token, expires_at, active, deleted,
                      created_at, updated_at
            "#,
        )
        .bind(token)
        .fetch_optional(pool)
        .await?;

        Ok(session)
    }
}
