/*
 * Responsibility
 * - Config読み込み → 依存生成 → Router 組み立て
 * - Middleware の適用 (request-id / trace / timeout, access token)
 * - axum::serve() で起動、SIGTERM/Ctrl-C で graceful shutdown
 */
use std::{panic, process, str::FromStr, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use axum::{Router, extract::DefaultBodyLimit, routing::get};
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::api::v1::extractors::payload_limit::MAX_PAYLOAD_BYTES;
use crate::config::Config;
use crate::middleware;
use crate::services::auth::{AuthService, PasswordHasher, TokenCodec};
use crate::services::cache::{CacheClient, MemoryCache, PostListCache, ValkeyClient};
use crate::state::AppState;

pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

fn init_tracing() {
    // RUST_LOG=info,notes_api=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // stderr can be hidden depending on how the process is launched
        tracing::error!(?info, "panic");

        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn connect_db(config: &Config) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&config.database_url)
        .context("invalid DATABASE_URL")?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect_with(options)
        .await
        .context("failed to connect to database")?;

    MIGRATOR
        .run(&pool)
        .await
        .context("failed to run migrations")?;

    Ok(pool)
}

async fn build_cache(config: &Config) -> Result<Arc<dyn CacheClient>> {
    let client: Arc<dyn CacheClient> = match &config.cache_url {
        Some(url) => Arc::new(ValkeyClient::new(url).await?),
        None => Arc::new(MemoryCache::new()),
    };
    tracing::info!(backend = client.backend_name(), "post listing cache ready");
    Ok(client)
}

pub(crate) async fn build_state(config: &Config) -> Result<AppState> {
    let db = connect_db(config).await?;

    let hasher = PasswordHasher::new(config.password_hash)?;
    let tokens = TokenCodec::new(config.jwt_secret.as_bytes());
    let auth = Arc::new(AuthService::new(
        hasher,
        tokens,
        config.access_token_ttl_seconds,
    )?);

    let post_lists = PostListCache::new(
        build_cache(config).await?,
        Duration::from_secs(config.posts_cache_ttl_seconds),
    );

    Ok(AppState::new(db, auth, post_lists))
}

pub(crate) fn build_router(state: AppState, config: &Config) -> Router {
    let router = Router::new()
        .route("/health", get(api::v1::handlers::health::health))
        .nest("/api/v1", api::v1::routes(state.clone()))
        // Bodies without a declared length are capped here; declared lengths are
        // rejected earlier by the payload guard.
        .layer(DefaultBodyLimit::max(MAX_PAYLOAD_BYTES))
        .with_state(state);

    middleware::http::apply(router, Duration::from_secs(config.request_timeout_seconds))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
