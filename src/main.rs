use careerhub::api::{create_router, AppState};
use careerhub::domain::ports::JobStore;
use careerhub::infrastructure::{
    AppConfig, InMemoryJobStore, LogFormat, MongoJobStore, StoreBackend,
};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "careerhub=debug,api=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for CTRL+C");
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
                warn!(error = %e, "Failed to listen for SIGTERM");
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
    info!("Received shutdown signal");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    init_tracing(config.logging.format);

    let mut mongo = None;
    let store: Arc<dyn JobStore> = match config.database.backend {
        StoreBackend::Mongo => {
            let client = Arc::new(MongoJobStore::connect(&config.database).await?);
            mongo = Some(client.clone());
            client
        }
        StoreBackend::Memory => {
            warn!("Using in-memory job store, data will not survive a restart");
            Arc::new(InMemoryJobStore::new())
        }
    };

    let addr = config.socket_addr()?;
    let app = create_router(AppState::new(store, config));

    info!("API server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(mongo) = mongo {
        mongo.shutdown().await;
        info!("MongoDB client shut down");
    }

    Ok(())
}
