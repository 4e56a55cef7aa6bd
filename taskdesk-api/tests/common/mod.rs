/// Common test utilities for integration tests
///
/// This module provides shared infrastructure for integration tests:
/// - Test database setup and cleanup
/// - Test user creation with a real password hash
/// - Session credential generation
/// - Form-encoded API call helpers
///
/// Tests require a running PostgreSQL reachable via `DATABASE_URL`.

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use taskdesk_api::app::{build_router, AppState};
use taskdesk_api::config::Config;
use taskdesk_shared::auth::jwt::{create_token, Claims};
use taskdesk_shared::auth::password::hash_password;
use taskdesk_shared::models::session::{CreateSession, Session};
use taskdesk_shared::models::task::{CreateTask, Task, TaskStatus};
use taskdesk_shared::models::user::{CreateUser, User};
use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use tower::Service as _;
use uuid::Uuid;

/// Password every test user is created with
pub const TEST_PASSWORD: &str = "correct horse battery staple";

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub config: Config,
    pub user: User,
    pub token: String,
}

impl TestContext {
    /// Creates a new test context with a fresh user and active session
    pub async fn new() -> anyhow::Result<Self> {
        let config = Config::from_env()?;

        let db = PgPool::connect(&config.database.url).await?;

        // Run migrations (path relative to Cargo.toml, not this file)
        sqlx::migrate!("../taskdesk-shared/migrations").run(&db).await?;

        let user = User::create(
            &db,
            CreateUser {
                name: Some("Test User".to_string()),
                email: format!("test-{}@example.com", Uuid::new_v4()),
                password_hash: hash_password(TEST_PASSWORD)?,
                approved: true,
            },
        )
        .await?;

        let state = AppState::new(db.clone(), config.clone());
        let app = build_router(state);

        let mut ctx = TestContext {
            db,
            app,
            config,
            user,
            token: String::new(),
        };
        ctx.token = ctx.issue_session(Duration::hours(24)).await?;

        Ok(ctx)
    }

    /// Returns authorization header value for the context's session
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.token)
    }

    /// Mints a credential and session row with the given validity window
    ///
    /// A negative duration produces an already-expired pair, used to test
    /// lazy revocation.
    pub async fn issue_session(&self, expires_in: Duration) -> anyhow::Result<String> {
        let claims =
            Claims::with_expiration(self.user.id, self.user.email.clone(), expires_in);
        let token = create_token(&claims, &self.config.jwt.secret)?;

        let expires_at = DateTime::<Utc>::from_timestamp(claims.exp, 0)
            .ok_or_else(|| anyhow::anyhow!("invalid expiry timestamp"))?;

        Session::create(
            &self.db,
            CreateSession {
                user_id: self.user.id,
                email: self.user.email.clone(),
                token: token.clone(),
                expires_at,
            },
        )
        .await?;

        Ok(token)
    }

    /// POSTs a form-encoded body with the context's credential
    pub async fn post_form(&self, uri: &str, form: &[(&str, &str)]) -> Response<Body> {
        self.post_form_with_auth(uri, form, Some(&self.auth_header()))
            .await
    }

    /// POSTs a form-encoded body with an explicit (or absent) credential
    pub async fn post_form_with_auth(
        &self,
        uri: &str,
        form: &[(&str, &str)],
        auth: Option<&str>,
    ) -> Response<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/x-www-form-urlencoded");

        if let Some(auth) = auth {
            builder = builder.header("authorization", auth);
        }

        let request = builder.body(Body::from(form_encode(form))).unwrap();

        self.app.clone().call(request).await.unwrap()
    }

    /// Cleans up test data
    ///
    /// Deleting the user cascades to sessions and tasks.
    pub async fn cleanup(&self) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(self.user.id)
            .execute(&self.db)
            .await?;
        Ok(())
    }
}

/// Encodes key/value pairs as an application/x-www-form-urlencoded body
pub fn form_encode(pairs: &[(&str, &str)]) -> String {
    fn escape(value: &str) -> String {
        value
            .replace('%', "%25")
            .replace('&', "%26")
            .replace('=', "%3D")
            .replace('+', "%2B")
            .replace(' ', "+")
    }

    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", escape(k), escape(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Helper to create a task directly through the model layer
pub async fn create_test_task(
    ctx: &TestContext,
    title: &str,
    status: TaskStatus,
) -> anyhow::Result<Task> {
    let task = Task::create(
        &ctx.db,
        CreateTask {
            user_id: ctx.user.id,
            title: title.to_string(),
            description: Some(format!("{} description", title)),
            due_date: None,
            status,
        },
    )
    .await?;

    Ok(task)
}

/// Reads a response body as JSON, panicking with the body on failure
pub async fn body_json(response: Response<Body>) -> (StatusCode, serde_json::Value) {
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body)
        .unwrap_or_else(|_| panic!("Non-JSON body: {}", String::from_utf8_lossy(&body)));
    (status, json)
}
