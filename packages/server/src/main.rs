use std::sync::Arc;

use anyhow::Context;
use common::storage::s3::{S3Config, S3ObjectStore};
use tracing::{info, warn};

use server::config::AppConfig;
use server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = server::database::init_db(&config.database.url)
        .await
        .context("Failed to initialize database")?;

    let object_store = S3ObjectStore::new(S3Config {
        endpoint: config.storage.endpoint.clone(),
        access_key: config.storage.access_key.clone(),
        secret_key: config.storage.secret_key.clone(),
        region: config.storage.region.clone(),
    });
    if let Err(e) = object_store.ensure_buckets().await {
        warn!("Failed to prepare object store buckets: {e}");
    }

    let mq = if config.mq.enabled {
        let queue = mq::init_mq(mq::MqConfig {
            url: config.mq.url.clone(),
            pool_size: config.mq.pool_size,
        })
        .await
        .context("Failed to connect to message queue")?;
        Some(Arc::new(queue))
    } else {
        None
    };

    let addr = format!("{}:{}", config.server.host, config.server.port);

    let state = AppState {
        db,
        object_store: Arc::new(object_store),
        mq,
        config,
    };

    if let Some(dir) = state.config.seed.dev_data_dir.clone() {
        server::seed::populate_dev_data(&state, std::path::Path::new(&dir)).await;
    }

    let app = server::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server running at http://{addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
