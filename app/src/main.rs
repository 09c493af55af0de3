use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use marquee::config::Config;
use marquee::tmdb::TmdbClient;
use marquee::{build_router, AppState};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    info!("Starting Marquee...");

    let config = Config::new()?;
    info!("Configuration loaded");

    let tmdb_client =
        TmdbClient::new(&config.tmdb_api_key, &config.tmdb_language)?.with_base_url(&config.tmdb_base_url);
    info!("TMDB client initialized (language {})", config.tmdb_language);

    let state = AppState {
        tmdb: Arc::new(tmdb_client),
    };

    let app = build_router(state, &config.static_dir);

    let addr: SocketAddr = config.bind_addr().parse()?;
    info!("Server running on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
