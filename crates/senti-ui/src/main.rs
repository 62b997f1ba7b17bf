mod api_client;
mod error;
mod frontend;
mod routes;

use std::sync::Arc;
use std::time::Duration;

use senti_core::{SearchRoute, StoreBackend};
use tracing_subscriber::EnvFilter;

use crate::api_client::ApiClient;
use crate::frontend::{FrontEnd, SearchSource};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = senti_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let api = ApiClient::new(
        &config.api_url,
        &format!("{}/search", config.api_base_url()),
        Duration::from_secs(config.ui_api_timeout_secs),
    )?;

    let search = match config.ui_search_route {
        SearchRoute::Direct => {
            if config.store_backend == StoreBackend::Memory {
                tracing::warn!(
                    "direct search with the in-memory store only sees this process; \
                     set SENTI_UI_SEARCH_ROUTE=api to search the API's records"
                );
            }
            SearchSource::Direct(Arc::new(senti_engine::build_indexer(&config).await?))
        }
        SearchRoute::Api => SearchSource::Api,
    };

    let app = routes::build_router(Arc::new(FrontEnd::new(api, search)));

    let listener = tokio::net::TcpListener::bind(config.ui_bind_addr).await?;
    tracing::info!(
        addr = %config.ui_bind_addr,
        api = %config.api_url,
        search = ?config.ui_search_route,
        "senti ui listening"
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
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
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
