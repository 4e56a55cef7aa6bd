/// Authentication endpoints: sign-in and logout
///
/// Sign-in verifies the password against the stored Argon2id hash, signs a
/// 24-hour credential, and persists a session row with the same expiry.
/// Logout flips that row; the token string itself is never invalidated
/// cryptographically, the row is the revocation authority.

use crate::app::AppState;
use crate::error::{validation_message, ApiError, ApiResponse, ApiResult};
use axum::{extract::State, http::HeaderMap, Form, Json};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use taskdesk_shared::auth::jwt::{create_token, Claims};
use taskdesk_shared::auth::middleware::bearer_token;
use taskdesk_shared::auth::password::verify_password;
use taskdesk_shared::models::session::{CreateSession, Session};
use taskdesk_shared::models::user::User;
use tracing::info;
use validator::Validate;

/// Form body for `POST /auth/sign-in`
///
/// Both fields are optional at the deserialization layer so the handler can
/// report every missing field in one validation message instead of a
/// generic body-rejection.
#[derive(Debug, Deserialize, Validate)]
pub struct SignInForm {
    /// Sign-in email
    #[validate(email(message = "Please provide a valid email address."))]
    pub user_email: Option<String>,

    /// Plaintext password, verified against the stored hash
    pub user_password: Option<String>,
}

impl SignInForm {
    /// Presence and format checks, collected into one message
    fn checked(self) -> Result<(String, String), ApiError> {
        let mut problems = Vec::new();

        if let Err(errors) = self.validate() {
            problems.push(validation_message(&errors));
        }

        let email = self
            .user_email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty());
        if email.is_none() {
            problems.push("Please provide a user email.".to_string());
        }

        let password = self.user_password.as_deref().filter(|p| !p.is_empty());
        if password.is_none() {
            problems.push("Please provide a user password.".to_string());
        }

        match (email, password) {
            (Some(email), Some(password)) if problems.is_empty() => {
                Ok((email.to_string(), password.to_string()))
            }
            _ => Err(ApiError::Validation(problems.join("; "))),
        }
    }
}

/// `POST /auth/sign-in`
///
/// Unknown email, unapproved account, and wrong password all collapse into
/// the same 401 so the response never reveals which part was wrong. No
/// session row is written on a failed attempt.
pub async fn sign_in(
    State(state): State<AppState>,
    Form(form): Form<SignInForm>,
) -> ApiResult<Json<ApiResponse<Value>>> {
    let (email, password) = form.checked()?;

    let user = User::find_active_by_email(&state.db, &email).await?;

    let Some(user) = user else {
        return Err(ApiError::Unauthorized(
            "Invalid email or password.".to_string(),
        ));
    };

    if !verify_password(&password, &user.password_hash)? {
        return Err(ApiError::Unauthorized(
            "Invalid email or password.".to_string(),
        ));
    }

    let claims = Claims::new(user.id, user.email.clone());
    let token = create_token(&claims, state.jwt_secret())?;

    let expires_at = DateTime::<Utc>::from_timestamp(claims.exp, 0).ok_or_else(|| {
        ApiError::Internal(format!("Invalid expiry timestamp: {}", claims.exp))
    })?;

    Session::create(
        &state.db,
        CreateSession {
            user_id: user.id,
            email: user.email.clone(),
            token: token.clone(),
            expires_at,
        },
    )
    .await?;

    info!(user_id = %user.id, "User signed in");

    Ok(Json(ApiResponse::ok(
        "Login successful.",
        json!({ "token": token }),
    )))
}

/// `POST /auth/logout`
///
/// Lives outside the auth gate: an expired credential must still be able to
/// reach logout, so the handler reads the bearer header itself and acts on
/// the session row directly. Revoking an already-revoked or unknown token
/// is a 404.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<ApiResponse<()>>> {
    let token = bearer_token(&headers)?;

    let session = Session::revoke_active_by_token(&state.db, token).await?;

    let Some(session) = session else {
        return Err(ApiError::NotFound(
            "Session not found or already revoked.".to_string(),
        ));
    };

    info!(user_id = %session.user_id, "User logged out");

    Ok(Json(ApiResponse::message("Successfully logged out.")))
}
