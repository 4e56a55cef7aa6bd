/// Application state and router builder
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET  /                          # Service banner (public)
/// ├── GET  /health                    # Health check (public)
/// ├── /auth/                          # Authentication (public side of the gate)
/// │   ├── POST /sign-in
/// │   └── POST /logout
/// └── /task/                         # Protected by the auth gate
///     ├── POST /add-or-edit-task
///     ├── POST /task-remove
///     ├── POST /task-list
///     └── POST /task-detail
/// ```
///
/// The public allow-list is the router structure itself: only the `/task`
/// group carries the auth gate layer.

use crate::config::Config;
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use taskdesk_shared::auth::middleware::authenticate;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned into each request handler via Axum's `State` extractor; the pool
/// and config are cheap to clone (pool is internally shared, config is
/// behind an Arc).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Secret used to sign and verify session credentials
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Public routes, no auth
    let public_routes = Router::new()
        .route("/", get(routes::health::root))
        .route("/health", get(routes::health::health_check));

    // Auth routes sit on the public side of the gate; logout reads the
    // bearer header itself.
    let auth_routes = Router::new()
        .route("/sign-in", post(routes::auth::sign_in))
        .route("/logout", post(routes::auth::logout));

    // Task routes require an active session
    let task_routes = Router::new()
        .route("/add-or-edit-task", post(routes::tasks::add_or_edit_task))
        .route("/task-remove", post(routes::tasks::remove_task))
        .route("/task-list", post(routes::tasks::task_list))
        .route("/task-detail", post(routes::tasks::task_detail))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_gate,
        ));

    let cors = build_cors(&state.config);

    Router::new()
        .merge(public_routes)
        .nest("/auth", auth_routes)
        .nest("/task", task_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// Auth gate middleware layer
///
/// Validates the bearer credential against the session store and injects
/// an `AuthContext` into request extensions. Rejection happens here, before
/// any handler runs.
async fn auth_gate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, crate::error::ApiError> {
    let auth = authenticate(&state.db, state.jwt_secret(), req.headers()).await?;

    req.extensions_mut().insert(auth);

    Ok(next.run(req).await)
}

/// Configures CORS from the allowed-origins list
fn build_cors(config: &Config) -> CorsLayer {
    if config.api.cors_origins.iter().any(|o| o == "*") {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    }
}
