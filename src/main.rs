use phoneauth::infrastructure;
use phoneauth::infrastructure::config::AppConfig;
use phoneauth::infrastructure::state::AppState;
use phoneauth::presentation;

use dotenvy::dotenv;
use std::env;
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use std::future::Future;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    init_tracing();

    let config = AppConfig::from_env()?;

    run(config, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}

fn init_tracing() {
    // try_init so repeated calls in tests are harmless
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            env::var("RUST_LOG").unwrap_or_else(|_| "phoneauth=debug,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

async fn run<F>(config: AppConfig, shutdown_signal: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (listener, app, state) = bootstrap(&config).await?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal)
    .await?;

    tracing::info!("Shutting down, closing connection pools");
    if let Some(redis) = &state.redis {
        redis.close();
    }
    state.pool.close().await;

    Ok(())
}

async fn bootstrap(
    config: &AppConfig,
) -> anyhow::Result<(tokio::net::TcpListener, axum::Router, AppState)> {
    let pool = infrastructure::db::create_pool(&config.database_url).await?;

    // Run migrations
    sqlx::migrate!().run(&pool).await?;

    let redis = infrastructure::redis::create_pool(&config.redis_url)?;
    infrastructure::redis::ping(&redis).await?;

    let state = AppState::from_config(pool, redis, config)?;
    let cors = presentation::middleware::cors::cors_layer(config.cors_allowed_origins.as_deref())?;
    let app = presentation::router::app(state.clone()).layer(cors);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::debug!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    Ok((listener, app, state))
}
