//! Shared helpers for the apishape end-to-end suite.
//!
//! Provides [`spawn_demo`]: binds a `TcpListener` on an ephemeral port,
//! wires up the demo service over a seeded `MemoryStore`, and returns the
//! local URL plus the store so tests can inspect or prepare data directly.

use std::sync::Arc;

use apishape::ApiConfig;
use apishape_demo::{build_router, DemoConfig, MemoryStore, Store};

/// Start the demo service with default shaping configuration.
///
/// # Panics
///
/// Panics if the TCP listener cannot be bound or the service fails to start.
pub async fn spawn_demo() -> (String, Arc<MemoryStore>) {
    spawn_demo_with(ApiConfig::default()).await
}

/// Start the demo service with `api` as its shaping configuration and return
/// `(base_url, store)`, e.g. `http://127.0.0.1:51234`.
///
/// The service runs in a background `tokio` task.
pub async fn spawn_demo_with(api: ApiConfig) -> (String, Arc<MemoryStore>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("get local addr");
    let base_url = format!("http://{addr}");

    let mem_store = Arc::new(MemoryStore::seeded());
    let store: Arc<dyn Store> = Arc::clone(&mem_store) as Arc<dyn Store>;
    let router = build_router(store, DemoConfig::new(addr, base_url.clone(), api));

    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("conformance service error");
    });

    (base_url, mem_store)
}
