//! HTTP request handlers.
//!
//! Handlers receive an [`Api`](apishape_axum::Api) extractor and answer
//! through it, so every body follows the configured envelopes.

pub mod projects;

use std::sync::Arc;

use apishape::{ApiConfig, ApiException, ShapeError};
use apishape_axum::ApiError;
use axum::extract::FromRef;

use crate::{config::DemoConfig, store::Store, store::StoreError};

/// Shared application state threaded through all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: DemoConfig,
}

impl FromRef<AppState> for Arc<ApiConfig> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.config.api)
    }
}

/// Failures a handler hands back to [`Api::finish`](apishape_axum::Api::finish).
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Shape(#[from] ShapeError),
}

impl From<AppError> for ApiError {
    fn from(e: AppError) -> Self {
        match e {
            AppError::Store(e) => ApiError::Exception(ApiException::from(e)),
            AppError::Shape(e) => ApiError::Shape(e),
        }
    }
}
