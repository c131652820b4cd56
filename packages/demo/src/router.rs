//! Assembles the axum [`Router`].

use std::sync::Arc;

use apishape_axum::route_not_found;
use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::{
    config::DemoConfig,
    handlers::{projects, AppState},
    store::Store,
};

/// Build the complete application router with shared state.
pub fn build_router(store: Arc<dyn Store>, config: DemoConfig) -> Router {
    let state = AppState { store, config };

    Router::new()
        .route("/v1/projects", get(projects::index).post(projects::store))
        .route(
            "/v1/projects/{id}",
            get(projects::show)
                .put(projects::update)
                .patch(projects::update)
                .delete(projects::destroy)
                .post(projects::overridden),
        )
        .fallback(route_not_found)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
