//! `apishape-demo`: a projects API shaped by apishape.
//!
//! # Quick start
//!
//! ```sh
//! # Default envelopes on the default port:
//! apishape-demo
//!
//! # Custom envelopes and address:
//! APISHAPE_CONFIG=./apishape.json APISHAPE_BIND=127.0.0.1:8080 apishape-demo
//! ```
//!
//! See [`DemoConfig::from_env`] for the full list of variables.

use std::sync::Arc;

use apishape_demo::{build_router, DemoConfig, MemoryStore, Store};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "apishape_demo=info,tower_http=debug".into()),
        )
        .init();

    let config = match DemoConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("invalid configuration: {e}");
            std::process::exit(2);
        }
    };

    let store: Arc<dyn Store> = Arc::new(MemoryStore::seeded());
    tracing::info!("store: in-memory, seeded with 100 projects");

    let app = build_router(store, config.clone());

    tracing::info!("listening on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {e}", config.bind_addr));

    axum::serve(listener, app).await.expect("server error");
}
