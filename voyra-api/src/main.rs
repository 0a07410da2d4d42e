use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use voyra_api::{app, app_config::Config, AppState};
use voyra_backend::{HttpBackend, MemoryBackend};
use voyra_domain::backend::BackendApi;
use voyra_domain::capability::CapabilitySet;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "voyra_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().expect("Failed to load config");
    tracing::info!("Starting {} on port {}", config.plugin.name, config.server.port);

    let backend: Arc<dyn BackendApi> = match config.backend.mode.as_str() {
        "http" => Arc::new(
            HttpBackend::new(Duration::from_secs(config.backend.timeout_seconds))
                .expect("Failed to build backend client"),
        ),
        _ => Arc::new(MemoryBackend::with_sample_catalog()),
    };

    let capabilities = CapabilitySet::new(config.plugin.capabilities.iter().copied())
        .expect("Invalid capability set");
    tracing::info!("Declared capabilities: {:?}", capabilities.declared());

    let state = AppState::new(
        backend,
        capabilities,
        &config.plugin.name,
        &config.plugin.description,
        Duration::from_secs(config.plugin.hold_ttl_seconds),
    );

    let app = app(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind port");
    axum::serve(listener, app).await.expect("Server error");
}
