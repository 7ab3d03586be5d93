use candidate_tracker::{
    app,
    config::{get_config, init_config, LogFormat, StoreBackend},
    database::{
        memory::MemoryCandidateStore, pool::create_pool, postgres::PgCandidateStore,
        store::CandidateStore,
    },
    AppState,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_config()?;
    let config = get_config()?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt().with_env_filter(filter).json().init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }

    let store: Arc<dyn CandidateStore> = match config.store_backend {
        StoreBackend::Postgres => {
            let pool = create_pool(config).await?;
            let store = PgCandidateStore::new(pool);
            store.migrate().await?;
            Arc::new(store)
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory candidate store; data is lost on restart");
            Arc::new(MemoryCandidateStore::new())
        }
    };
    info!(store = store.backend_tag(), "Candidate store ready");

    let app_state = AppState::new(store);
    let router = app(app_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
