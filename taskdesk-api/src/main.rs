/// TaskDesk API server binary
///
/// Startup order: load config, connect the pool, run migrations, build the
/// router, serve. Any failure before `serve` aborts startup with a readable
/// error.

use taskdesk_api::{app, config::Config};
use taskdesk_shared::db::{migrations::run_migrations, pool};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskdesk_api=debug,taskdesk_shared=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    info!("Starting taskdesk-api v{}", taskdesk_shared::VERSION);

    let pool = pool::create_pool(pool::PoolConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;
    info!("Database pool established");

    run_migrations(&pool).await?;
    info!("Migrations applied");

    let bind_address = config.bind_address();
    let state = app::AppState::new(pool, config);
    let router = app::build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("Listening on {}", bind_address);

    axum::serve(listener, router).await?;

    Ok(())
}
