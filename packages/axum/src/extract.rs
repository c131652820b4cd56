//! The per-request builder extractor.
//!
//! [`Api`] gives every handler a fresh
//! [`ResponseBuilder`](apishape::ResponseBuilder) bound to the shared
//! [`ApiConfig`] and to what the request asked for (path, host, query,
//! method override, referer).

use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use apishape::{ApiConfig, ApiException, AttributeMap, RequestContext, ResponseBuilder};
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts, Method, StatusCode},
    response::{IntoResponse, Response},
};

use crate::emitter::AxumEmitter;
use crate::error::ApiError;
use crate::method::{
    header_override, is_delete_method, is_update_method, parse_override, METHOD_OVERRIDE_PARAM,
};
use crate::validation::ValidationErrors;

/// Per-request response builder.
///
/// Derefs to [`ResponseBuilder<AxumEmitter>`], so every `respond_*`
/// operation is available directly.
pub struct Api {
    builder: ResponseBuilder<AxumEmitter>,
    method: Method,
    method_override: Option<Method>,
    referer: Option<String>,
}

impl<S> FromRequestParts<S> for Api
where
    S: Send + Sync,
    Arc<ApiConfig>: FromRef<S>,
{
    type Rejection = std::convert::Infallible;

    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let api = Api::from_parts(parts, Arc::<ApiConfig>::from_ref(state));
        async move { Ok(api) }
    }
}

impl Api {
    pub fn from_parts(parts: &Parts, config: Arc<ApiConfig>) -> Self {
        let request = request_context(parts);
        let method_override = request
            .input(METHOD_OVERRIDE_PARAM)
            .and_then(parse_override)
            .or_else(|| header_override(&parts.headers));
        let referer = parts
            .headers
            .get(header::REFERER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        Self {
            builder: ResponseBuilder::with_emitter(config, request, AxumEmitter),
            method: parts.method.clone(),
            method_override,
            referer,
        }
    }

    /// The request method after any override.
    pub fn method(&self) -> &Method {
        self.method_override.as_ref().unwrap_or(&self.method)
    }

    /// Apply a `_method` field from the request body. It takes precedence
    /// over the query string and header.
    pub fn override_method_from(&mut self, input: &AttributeMap) -> &mut Self {
        if let Some(method) = input
            .get(METHOD_OVERRIDE_PARAM)
            .and_then(|v| v.as_str())
            .and_then(parse_override)
        {
            self.method_override = Some(method);
        }
        self
    }

    /// PUT or PATCH, directly or by override.
    pub fn is_update_request(&self) -> bool {
        is_update_method(self.method())
    }

    /// DELETE, directly or by override.
    pub fn is_delete_request(&self) -> bool {
        is_delete_method(self.method())
    }

    /// Answer failed validation: a 422 envelope with the field map on API
    /// routes, otherwise a 302 back to the referring page (or `/`).
    pub fn fail_validation(&mut self, errors: ValidationErrors) -> Response {
        if self.builder.is_api_request() {
            return self.builder.respond_unprocessable(errors);
        }
        let target = self.referer.clone().unwrap_or_else(|| "/".to_string());
        tracing::debug!(%target, fields = errors.len(), "validation failed, redirecting back");
        (StatusCode::FOUND, [(header::LOCATION, target)]).into_response()
    }

    /// Render an error with the deployment's error template.
    pub fn fail(&mut self, error: impl Into<ApiError>) -> Response {
        error.into().render(&mut self.builder)
    }

    /// Pass a handler outcome through, rendering a failure with
    /// [`fail`](Self::fail).
    pub fn finish<E: Into<ApiError>>(&mut self, outcome: Result<Response, E>) -> Response {
        outcome.unwrap_or_else(|e| self.fail(e))
    }

    pub fn into_inner(self) -> ResponseBuilder<AxumEmitter> {
        self.builder
    }
}

impl Deref for Api {
    type Target = ResponseBuilder<AxumEmitter>;

    fn deref(&self) -> &Self::Target {
        &self.builder
    }
}

impl DerefMut for Api {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.builder
    }
}

fn request_context(parts: &Parts) -> RequestContext {
    let mut request = RequestContext::new(parts.uri.path());
    let host = parts
        .headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .or_else(|| parts.uri.host());
    if let Some(host) = host {
        request = request.with_host(host);
    }
    if let Some(query) = parts.uri.query() {
        request = request.with_query_string(query);
    }
    request
}

/// Router fallback: a 404 error envelope via the route-not-found kind.
pub async fn route_not_found(mut api: Api) -> Response {
    tracing::debug!(path = api.request().path(), "no route matched");
    api.fail(ApiException::route_not_found("Not Found"))
}
