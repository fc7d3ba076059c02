use std::net::SocketAddr;
use std::sync::Arc;

use common::storage::filesystem::FilesystemImageStore;
use tracing::info;
use tracing_subscriber::EnvFilter;

use server::config::AppConfig;
use server::database::init_db;
use server::scorecard::ScorecardClient;
use server::seed::seed_bootstrap_admin;
use server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::load()?;

    let db = init_db(&config.database.url).await?;
    seed_bootstrap_admin(&db, &config.auth).await?;

    let images = FilesystemImageStore::new(
        config.storage.images_dir.clone(),
        config.storage.max_image_size,
    )
    .await?;
    let scorecard = ScorecardClient::new(config.scorecard.clone());

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    let state = AppState {
        db,
        config: Arc::new(config),
        images: Arc::new(images),
        scorecard: Arc::new(scorecard),
    };

    let app = server::build_router(state);

    info!("Server running at http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
