use anyhow::Context;
use beeld::app;
use beeld::state::{AppConfig, AppState};
use history::{KeyValueStorage, NoopStorage, SqliteStorage, VisitedSubs};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Log initialized");

    let config = AppConfig::from_env();
    tracing::info!(
        "Listing upstream: {} (cache ttl={}ms, capacity={})",
        config.reddit_base_url,
        config.listing_cache_ttl_ms,
        config.listing_cache_capacity
    );

    // Initialize History Storage
    let storage = open_history_storage(config.history_db_url.as_deref()).await;
    let history = VisitedSubs::load(storage).await;

    // Initialize HTTP Client
    let http_client = reqwest::Client::builder()
        .user_agent(config.proxy_user_agent.as_str())
        .build()
        .context("Failed to build HTTP client")?;

    let port = config.port;
    let app_state = AppState::new(config, http_client, history);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let router = app(app_state);
    axum::serve(listener, router).await?;

    Ok(())
}

/// 履歴の保存先を開く。開けなければ永続化なしで続行する
async fn open_history_storage(url: Option<&str>) -> Arc<dyn KeyValueStorage> {
    let Some(url) = url else {
        tracing::info!("History persistence disabled");
        return Arc::new(NoopStorage);
    };

    tracing::info!("Connecting to history database: {}", url);
    let opened = async {
        let pool = beeld::connect_database(url).await?;
        history::storage::migrate(&pool).await?;
        anyhow::Ok(pool)
    }
    .await;

    match opened {
        Ok(pool) => Arc::new(SqliteStorage::new(pool)),
        Err(e) => {
            tracing::warn!(
                "Failed to open history database, visits will not persist: {:#}",
                e
            );
            Arc::new(NoopStorage)
        }
    }
}
