use sitework_server::{AppConfig, AppState, build_router};
use sitework_store::Store;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sitework_server=info,sitework_store=info,tower_http=info".into()),
        )
        .init();

    let config = AppConfig::from_env()?;
    tracing::info!("data directory: {}", config.data_dir.display());
    if !config.registration_open {
        tracing::info!("registration is closed");
    }

    let store = Store::open_dir(&config.data_dir)?;
    tracing::info!("database initialized");

    let port = config.port;
    let base_url = config.base_url.clone();
    let app = build_router(AppState { store, config });

    tracing::info!("starting server at {base_url}");

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
