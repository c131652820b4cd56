//! Handler error type.

use std::sync::Arc;

use apishape::{ApiConfig, ApiException, RequestContext, ResponseBuilder, ShapeError};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::emitter::AxumEmitter;

/// An error a handler can return with `?`.
///
/// Rendered with the stock error template, since `IntoResponse` has no
/// access to the deployment config. Use [`Api::fail`](crate::Api::fail) to
/// render with the configured one.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transformation failed; always a 500.
    #[error(transparent)]
    Shape(#[from] ShapeError),

    /// A boundary error; status picked by the exception translator.
    #[error(transparent)]
    Exception(#[from] ApiException),
}

impl ApiError {
    /// Render through `builder`, honoring its config and status.
    pub(crate) fn render(self, builder: &mut ResponseBuilder<AxumEmitter>) -> Response {
        match self {
            ApiError::Shape(e) => {
                tracing::error!(error = %e, "failed to shape response");
                builder.respond_internal_error(e.to_string())
            }
            ApiError::Exception(e) => {
                tracing::debug!(kind = ?e.kind, code = ?e.code, "translating exception");
                builder.respond_with_error(e)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut builder = ResponseBuilder::with_emitter(
            Arc::new(ApiConfig::default()),
            RequestContext::default(),
            AxumEmitter,
        );
        self.render(&mut builder)
    }
}
