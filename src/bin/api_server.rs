// src/bin/api_server.rs

use desci_registry::app::{RegistryService, StatusBoard};
use desci_registry::infra::{config::Config, logging, store};
use desci_registry::transport;
use desci_registry::ProjectRegistry;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();
    let config = Config::from_env()?;

    // --- Store Initialization ---
    info!("> Connecting to key/value store ({})...", config.backend.label());
    let kv = store::connect(&config.backend).await?;
    match kv.is_available().await {
        Ok(true) => info!("> Store '{}' is available.", kv.backend_name()),
        Ok(false) => info!(
            "> Store '{}' reports unavailable; listings will be empty until it recovers.",
            kv.backend_name()
        ),
        Err(e) => error!("> Store availability check failed: {}", e),
    }

    // --- Service Initialization ---
    let registry = ProjectRegistry::with_settings(kv, config.registry_settings());
    let status = StatusBoard::new(config.status_success_after, config.status_error_after);
    let app_state = transport::http::AppState {
        service: Arc::new(RegistryService::with_status_board(registry, status)),
    };
    info!(
        "> RegistryService initialized (contract={} chain_id={}).",
        config.contract_address, config.chain_id
    );

    // --- API Server Initialization ---
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);
    let app = transport::http::create_router(app_state)
        .merge(
            SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", transport::http::ApiDoc::openapi()),
        )
        .layer(cors);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("> API server listening on http://{}", config.bind_addr);
    info!("> Swagger UI available at http://{}/swagger-ui", config.bind_addr);

    tokio::select! {
        result = axum::serve(listener, app) => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("> Shutdown signal received (Ctrl+C). Goodbye.");
        }
    }

    Ok(())
}
