//! The request-scoped response builder.
//!
//! A [`ResponseBuilder`] holds the mutable state of one response: status
//! code (default 200), accumulated headers, and pending meta. Setters
//! return `&mut Self` for chaining; each `respond_*` call emits one payload
//! through the builder's [`ResponseEmitter`].
//!
//! Meta is consumed by the payload that carries it. A second `respond_*`
//! call on the same builder does not repeat it.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;

use crate::attr::AttributeMap;
use crate::config::ApiConfig;
use crate::error::ShapeError;
use crate::exception::{translate_status, ApiException};
use crate::format::format_payload;
use crate::pagination::{PaginationInfo, Paginator};
use crate::request::RequestContext;
use crate::resource::Resource;
use crate::scope::Scope;
use crate::serializer::META_KEY;
use crate::transformer::Transformer;

/// Response headers, one value per name. Names are stored lowercase.
pub type Headers = BTreeMap<String, String>;

pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const JSONP_CONTENT_TYPE: &str = "text/javascript";

/// Status codes the builder sets on its own.
pub mod status {
    pub const OK: u16 = 200;
    pub const CREATED: u16 = 201;
    pub const NO_CONTENT: u16 = 204;
    pub const BAD_REQUEST: u16 = 400;
    pub const UNAUTHORIZED: u16 = 401;
    pub const FORBIDDEN: u16 = 403;
    pub const NOT_FOUND: u16 = 404;
    pub const NOT_ACCEPTABLE: u16 = 406;
    pub const UNPROCESSABLE_ENTITY: u16 = 422;
    pub const INTERNAL_SERVER_ERROR: u16 = 500;
}

/// Turns a finished payload into a framework response.
pub trait ResponseEmitter {
    type Output;

    /// Plain JSON. `body` is `None` for an empty body.
    fn json(&self, body: Option<Value>, status: u16, headers: Headers) -> Self::Output;

    /// JSON wrapped in a call to `callback`.
    fn jsonp(&self, callback: &str, body: Option<Value>, status: u16, headers: Headers)
        -> Self::Output;
}

/// Framework-neutral response produced by [`JsonEmitter`].
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub headers: Headers,
    pub body: Option<Value>,
    /// Set when the body is to be delivered as JSONP.
    pub callback: Option<String>,
}

impl ApiResponse {
    /// The wire body.
    pub fn body_string(&self) -> String {
        encode_body(self.body.as_ref(), self.callback.as_deref())
    }

    /// `None` for an empty body.
    pub fn content_type(&self) -> Option<&'static str> {
        match (&self.body, &self.callback) {
            (None, _) => None,
            (Some(_), Some(_)) => Some(JSONP_CONTENT_TYPE),
            (Some(_), None) => Some(JSON_CONTENT_TYPE),
        }
    }
}

/// Render a body for the wire: JSON text, `/**/cb(json);` for JSONP, or the
/// empty string.
pub fn encode_body(body: Option<&Value>, callback: Option<&str>) -> String {
    match (body, callback) {
        (None, _) => String::new(),
        (Some(body), Some(callback)) => format!("/**/{callback}({body});"),
        (Some(body), None) => body.to_string(),
    }
}

/// The default emitter; yields [`ApiResponse`] values.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEmitter;

impl ResponseEmitter for JsonEmitter {
    type Output = ApiResponse;

    fn json(&self, body: Option<Value>, status: u16, headers: Headers) -> ApiResponse {
        ApiResponse {
            status,
            headers,
            body,
            callback: None,
        }
    }

    fn jsonp(&self, callback: &str, body: Option<Value>, status: u16, headers: Headers) -> ApiResponse {
        ApiResponse {
            status,
            headers,
            body,
            callback: Some(callback.to_string()),
        }
    }
}

/// What [`ResponseBuilder::respond_created`] announces.
#[derive(Debug)]
pub enum Created {
    /// A domain value; answered through the item path.
    Resource(Resource),
    /// A message; answered through the success template.
    Message(Value),
}

impl From<Resource> for Created {
    fn from(resource: Resource) -> Self {
        Created::Resource(resource)
    }
}

impl From<Value> for Created {
    fn from(message: Value) -> Self {
        Created::Message(message)
    }
}

impl From<AttributeMap> for Created {
    fn from(message: AttributeMap) -> Self {
        Created::Message(Value::Object(message))
    }
}

impl From<&str> for Created {
    fn from(message: &str) -> Self {
        Created::Message(Value::String(message.to_string()))
    }
}

impl From<String> for Created {
    fn from(message: String) -> Self {
        Created::Message(Value::String(message))
    }
}

/// What an error responder reports.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ErrorPayload {
    /// The responder's stock message ("Not Found", "Forbidden", ...).
    #[default]
    Default,
    /// A message string or structured value, used verbatim.
    Message(Value),
    /// A caught error; its status is chosen by [`translate_status`].
    Exception(ApiException),
}

impl From<ApiException> for ErrorPayload {
    fn from(exception: ApiException) -> Self {
        ErrorPayload::Exception(exception)
    }
}

impl From<Value> for ErrorPayload {
    fn from(message: Value) -> Self {
        ErrorPayload::Message(message)
    }
}

impl From<AttributeMap> for ErrorPayload {
    fn from(message: AttributeMap) -> Self {
        ErrorPayload::Message(Value::Object(message))
    }
}

impl From<&str> for ErrorPayload {
    fn from(message: &str) -> Self {
        ErrorPayload::Message(Value::String(message.to_string()))
    }
}

impl From<String> for ErrorPayload {
    fn from(message: String) -> Self {
        ErrorPayload::Message(Value::String(message))
    }
}

/// Builds exactly the responses one request needs.
///
/// ```rust,ignore
/// let mut api = ResponseBuilder::new(config, RequestContext::new("/v1/projects"));
/// api.set_status_code(201)
///     .set_headers([("Location", "/v1/projects/7")])
///     .respond_item(project, ProjectTransformer::default())?;
/// ```
pub struct ResponseBuilder<E = JsonEmitter> {
    config: Arc<ApiConfig>,
    request: RequestContext,
    emitter: E,
    status: u16,
    headers: Headers,
    meta: AttributeMap,
}

impl ResponseBuilder<JsonEmitter> {
    pub fn new(config: Arc<ApiConfig>, request: RequestContext) -> Self {
        Self::with_emitter(config, request, JsonEmitter)
    }
}

impl<E: ResponseEmitter> ResponseBuilder<E> {
    pub fn with_emitter(config: Arc<ApiConfig>, request: RequestContext, emitter: E) -> Self {
        Self {
            config,
            request,
            emitter,
            status: status::OK,
            headers: Headers::new(),
            meta: AttributeMap::new(),
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn request(&self) -> &RequestContext {
        &self.request
    }

    /// Whether the current request is an API request per the configured
    /// `pattern` and `domain`.
    pub fn is_api_request(&self) -> bool {
        self.config
            .is_api_request(self.request.path(), self.request.host())
    }

    // --- state ---------------------------------------------------------------

    pub fn status_code(&self) -> u16 {
        self.status
    }

    pub fn set_status_code(&mut self, code: u16) -> &mut Self {
        self.status = code;
        self
    }

    /// Headers that would be sent now: configured defaults overridden by
    /// everything set on this builder.
    pub fn headers(&self) -> Headers {
        let mut headers: Headers = self
            .config
            .default_headers
            .iter()
            .map(|(k, v)| (k.to_ascii_lowercase(), v.clone()))
            .collect();
        headers.extend(self.headers.iter().map(|(k, v)| (k.clone(), v.clone())));
        headers
    }

    /// Merge `headers` in; later values win per name, compared
    /// case-insensitively.
    pub fn set_headers<I, K, V>(&mut self, headers: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers.extend(
            headers
                .into_iter()
                .map(|(k, v)| (k.into().to_ascii_lowercase(), v.into())),
        );
        self
    }

    pub fn meta(&self) -> &AttributeMap {
        &self.meta
    }

    /// Set meta for the next payload, replacing any meta not yet consumed.
    pub fn set_meta(&mut self, meta: AttributeMap) -> &mut Self {
        self.meta = meta;
        self
    }

    fn take_meta(&mut self) -> AttributeMap {
        std::mem::take(&mut self.meta)
    }

    // --- payloads ------------------------------------------------------------

    /// Serialize `resource`, folding in (and consuming) pending meta.
    pub fn resource_payload(&mut self, mut resource: Resource) -> Result<AttributeMap, ShapeError> {
        let meta = self.take_meta();
        if !meta.is_empty() {
            resource.merge_meta(meta);
        }
        let includes = self.request.includes();
        Scope::root(&includes, self.config.resource_serializer()).serialize(resource)
    }

    pub fn item_payload<T, X>(&mut self, value: T, transformer: X) -> Result<AttributeMap, ShapeError>
    where
        T: Send + 'static,
        X: Transformer<T> + 'static,
    {
        self.resource_payload(Resource::item(value, transformer))
    }

    pub fn collection_payload<T, X, I>(
        &mut self,
        values: I,
        transformer: X,
    ) -> Result<AttributeMap, ShapeError>
    where
        T: Send + 'static,
        X: Transformer<T> + 'static,
        I: IntoIterator<Item = T>,
    {
        self.resource_payload(Resource::collection(values, transformer))
    }

    /// Serialize one page. Every request query parameter except `page` is
    /// carried onto the navigation links.
    pub fn pagination_payload<P, X>(
        &mut self,
        mut paginator: P,
        transformer: X,
    ) -> Result<AttributeMap, ShapeError>
    where
        P: Paginator,
        P::Item: Send + 'static,
        X: Transformer<P::Item> + 'static,
    {
        for (key, value) in self.request.preserved_query() {
            paginator.append_query(&key, &value);
        }
        let pagination = PaginationInfo::from_paginator(&paginator);
        let resource =
            Resource::collection(paginator.into_items(), transformer).with_pagination(pagination);
        self.resource_payload(resource)
    }

    // --- terminal responders -------------------------------------------------

    /// Emit an arbitrary payload. Pending meta is added under `meta`.
    pub fn respond(&mut self, mut payload: AttributeMap) -> E::Output {
        let meta = self.take_meta();
        if !meta.is_empty() {
            payload.insert(META_KEY.into(), Value::Object(meta));
        }
        self.emit(Some(Value::Object(payload)))
    }

    pub fn respond_resource(&mut self, resource: Resource) -> Result<E::Output, ShapeError> {
        let payload = self.resource_payload(resource)?;
        Ok(self.respond(payload))
    }

    pub fn respond_item<T, X>(&mut self, value: T, transformer: X) -> Result<E::Output, ShapeError>
    where
        T: Send + 'static,
        X: Transformer<T> + 'static,
    {
        self.respond_resource(Resource::item(value, transformer))
    }

    pub fn respond_collection<T, X, I>(
        &mut self,
        values: I,
        transformer: X,
    ) -> Result<E::Output, ShapeError>
    where
        T: Send + 'static,
        X: Transformer<T> + 'static,
        I: IntoIterator<Item = T>,
    {
        self.respond_resource(Resource::collection(values, transformer))
    }

    pub fn respond_with_pagination<P, X>(
        &mut self,
        paginator: P,
        transformer: X,
    ) -> Result<E::Output, ShapeError>
    where
        P: Paginator,
        P::Item: Send + 'static,
        X: Transformer<P::Item> + 'static,
    {
        let payload = self.pagination_payload(paginator, transformer)?;
        Ok(self.respond(payload))
    }

    /// Success envelope built from the configured `successFormat`.
    pub fn respond_success(&mut self, message: impl Into<Value>) -> E::Output {
        let payload = format_payload(&message.into(), self.status, &self.config.success_format);
        self.respond(payload)
    }

    /// 201: a resource goes through the item path, anything else through the
    /// success template.
    pub fn respond_created(&mut self, created: impl Into<Created>) -> Result<E::Output, ShapeError> {
        self.set_status_code(status::CREATED);
        match created.into() {
            Created::Resource(resource) => self.respond_resource(resource),
            Created::Message(message) => Ok(self.respond_success(message)),
        }
    }

    /// 204 with an empty body. Pending meta is discarded.
    pub fn respond_no_content(&mut self) -> E::Output {
        self.take_meta();
        self.set_status_code(status::NO_CONTENT);
        self.emit(None)
    }

    /// Error envelope built from the configured `errorFormat`, with the
    /// current status code. An [`ApiException`] first has its status
    /// translated.
    pub fn respond_with_error(&mut self, error: impl Into<ErrorPayload>) -> E::Output {
        self.error_with_default(error.into(), "Unknown Error")
    }

    pub fn respond_unauthorized(&mut self, error: impl Into<ErrorPayload>) -> E::Output {
        self.set_status_code(status::UNAUTHORIZED);
        self.error_with_default(error.into(), "Unauthorized")
    }

    pub fn respond_forbidden(&mut self, error: impl Into<ErrorPayload>) -> E::Output {
        self.set_status_code(status::FORBIDDEN);
        self.error_with_default(error.into(), "Forbidden")
    }

    pub fn respond_not_found(&mut self, error: impl Into<ErrorPayload>) -> E::Output {
        self.set_status_code(status::NOT_FOUND);
        self.error_with_default(error.into(), "Not Found")
    }

    pub fn respond_not_acceptable(&mut self, error: impl Into<ErrorPayload>) -> E::Output {
        self.set_status_code(status::NOT_ACCEPTABLE);
        self.error_with_default(error.into(), "Not Acceptable")
    }

    pub fn respond_unprocessable(&mut self, error: impl Into<ErrorPayload>) -> E::Output {
        self.set_status_code(status::UNPROCESSABLE_ENTITY);
        self.error_with_default(error.into(), "Unprocessable Entity")
    }

    pub fn respond_internal_error(&mut self, error: impl Into<ErrorPayload>) -> E::Output {
        self.set_status_code(status::INTERNAL_SERVER_ERROR);
        self.error_with_default(error.into(), "Internal Server Error")
    }

    fn error_with_default(&mut self, error: ErrorPayload, default_message: &str) -> E::Output {
        let message = match error {
            ErrorPayload::Default => Value::String(default_message.to_string()),
            ErrorPayload::Message(message) => message,
            ErrorPayload::Exception(exception) => {
                self.status = translate_status(&exception, self.status);
                Value::String(exception.message)
            }
        };
        let payload = format_payload(&message, self.status, &self.config.error_format);
        self.respond(payload)
    }

    fn emit(&self, body: Option<Value>) -> E::Output {
        let headers = self.headers();
        let callback = body.as_ref().and(self.request.callback());
        tracing::debug!(
            status = self.status,
            jsonp = callback.is_some(),
            empty = body.is_none(),
            "emitting response"
        );
        match callback {
            Some(callback) => self.emitter.jsonp(callback, body, self.status, headers),
            None => self.emitter.json(body, self.status, headers),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attr::object;
    use crate::config::SerializerKind;
    use crate::pagination::LengthAwarePaginator;
    use crate::transformer::PassThrough;
    use serde::Serialize;
    use serde_json::json;

    #[derive(Debug, Clone, Serialize)]
    struct Manager {
        id: u64,
        name: String,
    }

    #[derive(Debug, Clone, Serialize)]
    struct Project {
        id: u64,
        title: String,
        #[serde(skip)]
        manager: Option<Manager>,
    }

    struct ProjectTransformer;

    impl Transformer<Project> for ProjectTransformer {
        fn transform(&self, p: &Project) -> AttributeMap {
            object(json!({ "id": p.id, "title": p.title }))
        }

        fn available_includes(&self) -> &[&'static str] {
            &["manager"]
        }

        fn default_includes(&self) -> &[&'static str] {
            &["manager"]
        }

        fn include(&self, name: &str, p: &Project) -> Result<Option<Resource>, ShapeError> {
            match name {
                "manager" => Ok(p.manager.clone().map(Resource::plain)),
                other => Err(ShapeError::UnknownInclude(other.to_string())),
            }
        }
    }

    fn project(id: u64) -> Project {
        Project {
            id,
            title: format!("p{id}"),
            manager: None,
        }
    }

    fn builder() -> ResponseBuilder {
        ResponseBuilder::new(Arc::new(ApiConfig::default()), RequestContext::new("/v1/projects"))
    }

    fn builder_with(config: ApiConfig, request: RequestContext) -> ResponseBuilder {
        ResponseBuilder::new(Arc::new(config), request)
    }

    fn body(r: &ApiResponse) -> &Value {
        r.body.as_ref().expect("response has a body")
    }

    #[test]
    fn item_with_absent_manager_renders_null() {
        let r = builder().respond_item(project(1), ProjectTransformer).unwrap();
        assert_eq!(r.status, 200);
        assert_eq!(body(&r), &json!({"id": 1, "title": "p1", "manager": null}));
    }

    #[test]
    fn meta_is_consumed_once() {
        let mut api = builder();
        api.set_meta(object(json!({"foo": "bar"})));
        let first = api.respond_item(project(1), ProjectTransformer).unwrap();
        assert_eq!(body(&first)["meta"], json!({"foo": "bar"}));

        let second = api.respond_item(project(2), ProjectTransformer).unwrap();
        assert!(body(&second).get("meta").is_none());
        assert!(api.meta().is_empty());
    }

    #[test]
    fn set_meta_replaces_instead_of_merging() {
        let mut api = builder();
        api.set_meta(object(json!({"a": 1})))
            .set_meta(object(json!({"b": 2})));
        let r = api.respond_success("ok");
        assert_eq!(body(&r)["meta"], json!({"b": 2}));
    }

    #[test]
    fn headers_merge_last_write_wins() {
        let mut config = ApiConfig::default();
        config.default_headers.insert("a".into(), "0".into());
        config.default_headers.insert("x-default".into(), "yes".into());
        let mut api = builder_with(config, RequestContext::new("/v1/p"));
        api.set_headers([("a", "1")]).set_headers([("a", "2"), ("b", "3")]);
        let r = api.respond_success("ok");
        assert_eq!(r.headers.get("a").map(String::as_str), Some("2"));
        assert_eq!(r.headers.get("b").map(String::as_str), Some("3"));
        assert_eq!(r.headers.get("x-default").map(String::as_str), Some("yes"));
    }

    #[test]
    fn header_names_merge_case_insensitively() {
        let mut config = ApiConfig::default();
        config.default_headers.insert("X-Api-Version".into(), "1".into());
        let mut api = builder_with(config, RequestContext::new("/v1/p"));
        api.set_headers([("x-trace", "first")])
            .set_headers([("X-Trace", "second"), ("x-api-version", "2")]);
        let r = api.respond_success("ok");
        assert_eq!(r.headers.len(), 2);
        assert_eq!(r.headers.get("x-trace").map(String::as_str), Some("second"));
        assert_eq!(r.headers.get("x-api-version").map(String::as_str), Some("2"));
    }

    #[test]
    fn no_content_is_empty_regardless_of_state() {
        let mut api = builder();
        api.set_meta(object(json!({"foo": "bar"})))
            .set_headers([("x-trace", "1")])
            .set_status_code(418);
        let r = api.respond_no_content();
        assert_eq!(r.status, 204);
        assert!(r.body.is_none());
        assert_eq!(r.body_string(), "");
        assert_eq!(r.content_type(), None);
        assert!(api.meta().is_empty());
    }

    #[test]
    fn no_content_ignores_jsonp_callback() {
        let mut api = builder_with(
            ApiConfig::default(),
            RequestContext::new("/v1/p").with_query([("callback", "cb")]),
        );
        let r = api.respond_no_content();
        assert!(r.callback.is_none());
        assert_eq!(r.body_string(), "");
    }

    #[test]
    fn pagination_links_preserve_query_but_not_page() {
        let request = RequestContext::new("/v1/projects").with_query([("sort", "asc"), ("page", "3")]);
        let mut api = builder_with(ApiConfig::default(), request);
        let all: Vec<Project> = (1..=100).map(project).collect();
        let page = LengthAwarePaginator::from_all(all, 25, 3, "http://api.test/v1/projects");
        let r = api.respond_with_pagination(page, ProjectTransformer).unwrap();
        let links = &body(&r)["meta"]["pagination"]["links"];
        assert_eq!(links["previous"], json!("http://api.test/v1/projects?sort=asc&page=2"));
        assert_eq!(links["next"], json!("http://api.test/v1/projects?sort=asc&page=4"));
        assert_eq!(body(&r)["data"].as_array().map(Vec::len), Some(25));
        assert_eq!(body(&r)["data"][0]["id"], json!(51));
    }

    #[test]
    fn pagination_and_meta_coexist() {
        let mut api = builder();
        api.set_meta(object(json!({"foo": "bar"})));
        let page = LengthAwarePaginator::from_all(vec![project(1)], 25, 1, "/v1/projects");
        let r = api.respond_with_pagination(page, ProjectTransformer).unwrap();
        assert_eq!(body(&r)["meta"]["foo"], json!("bar"));
        assert_eq!(body(&r)["meta"]["pagination"]["total_pages"], json!(1));
    }

    #[test]
    fn exception_code_beats_preset_status() {
        let mut api = builder();
        api.set_status_code(403);
        let r = api.respond_with_error(ApiException::other("conflict").with_code(409));
        assert_eq!(r.status, 409);
        assert_eq!(body(&r), &json!({"error": {"code": 409, "message": "conflict"}}));
    }

    #[test]
    fn preset_status_survives_codeless_exception() {
        let r = builder().respond_forbidden(ApiException::model_not_found("hidden"));
        assert_eq!(r.status, 403);
        assert_eq!(body(&r)["error"]["code"], json!(403));
    }

    #[test]
    fn not_found_exception_defaults_to_404() {
        let r = builder().respond_with_error(ApiException::model_not_found("No project 9"));
        assert_eq!(r.status, 404);
        assert_eq!(body(&r)["error"]["message"], json!("No project 9"));
    }

    #[test]
    fn other_exception_defaults_to_400() {
        let r = builder().respond_with_error(ApiException::other("bad"));
        assert_eq!(r.status, 400);
    }

    #[test]
    fn plain_message_keeps_current_status() {
        let r = builder().respond_with_error("oops");
        assert_eq!(r.status, 200);
        assert_eq!(body(&r), &json!({"error": {"code": 200, "message": "oops"}}));
    }

    #[test]
    fn shortcuts_set_status_and_default_messages() {
        let cases: [(fn(&mut ResponseBuilder) -> ApiResponse, u16, &str); 6] = [
            (|a| a.respond_unauthorized(ErrorPayload::Default), 401, "Unauthorized"),
            (|a| a.respond_forbidden(ErrorPayload::Default), 403, "Forbidden"),
            (|a| a.respond_not_found(ErrorPayload::Default), 404, "Not Found"),
            (|a| a.respond_not_acceptable(ErrorPayload::Default), 406, "Not Acceptable"),
            (|a| a.respond_unprocessable(ErrorPayload::Default), 422, "Unprocessable Entity"),
            (|a| a.respond_internal_error(ErrorPayload::Default), 500, "Internal Server Error"),
        ];
        for (respond, code, message) in cases {
            let r = respond(&mut builder());
            assert_eq!(r.status, code);
            assert_eq!(body(&r), &json!({"error": {"code": code, "message": message}}));
        }
    }

    #[test]
    fn validation_errors_go_out_as_structured_message() {
        let errors = object(json!({"title": ["The title field is required."]}));
        let r = builder().respond_unprocessable(errors);
        assert_eq!(r.status, 422);
        assert_eq!(
            body(&r)["error"]["message"],
            json!({"title": ["The title field is required."]})
        );
    }

    #[test]
    fn created_with_resource_uses_item_path() {
        let r = builder()
            .respond_created(Resource::item(project(5), ProjectTransformer))
            .unwrap();
        assert_eq!(r.status, 201);
        assert_eq!(body(&r)["id"], json!(5));
        assert!(body(&r).get("success").is_none());
    }

    #[test]
    fn created_with_message_uses_success_template() {
        let r = builder().respond_created("ok").unwrap();
        assert_eq!(r.status, 201);
        assert_eq!(body(&r), &json!({"success": {"code": 201, "message": "ok"}}));
    }

    #[test]
    fn created_with_plain_value_uses_pass_through() {
        let r = builder()
            .respond_created(Resource::plain(Manager { id: 2, name: "lee".into() }))
            .unwrap();
        assert_eq!(body(&r), &json!({"id": 2, "name": "lee"}));
    }

    #[test]
    fn collection_respects_data_array_serializer() {
        let config = ApiConfig {
            serializer: SerializerKind::DataArray,
            ..ApiConfig::default()
        };
        let mut api = builder_with(config, RequestContext::new("/v1/p"));
        let item = api.respond_item(project(1), ProjectTransformer).unwrap();
        assert_eq!(body(&item)["data"]["id"], json!(1));
        let coll = api
            .respond_collection(vec![project(1), project(2)], ProjectTransformer)
            .unwrap();
        assert_eq!(body(&coll)["data"][1]["id"], json!(2));
    }

    #[test]
    fn exclude_param_drops_default_include() {
        let mut api = builder_with(
            ApiConfig::default(),
            RequestContext::new("/v1/p").with_query([("exclude", "manager")]),
        );
        let r = api.respond_item(project(1), ProjectTransformer).unwrap();
        assert!(body(&r).get("manager").is_none());
    }

    #[test]
    fn jsonp_callback_wraps_body() {
        let mut api = builder_with(
            ApiConfig::default(),
            RequestContext::new("/v1/p").with_query([("callback", "handle")]),
        );
        let r = api.respond_success("hi");
        assert_eq!(r.callback.as_deref(), Some("handle"));
        assert_eq!(r.content_type(), Some(JSONP_CONTENT_TYPE));
        assert_eq!(
            r.body_string(),
            r#"/**/handle({"success":{"code":200,"message":"hi"}});"#
        );
    }

    #[test]
    fn custom_templates_are_honored() {
        let config = ApiConfig {
            error_format: object(json!({"status": "fail", "detail": {"why": ":message", "http": ":code"}})),
            ..ApiConfig::default()
        };
        let r = builder_with(config, RequestContext::new("/v1/p")).respond_not_found(ErrorPayload::Default);
        assert_eq!(
            body(&r),
            &json!({"status": "fail", "detail": {"why": "Not Found", "http": 404}})
        );
    }

    #[test]
    fn payload_getters_consume_meta_without_emitting() {
        let mut api = builder();
        api.set_meta(object(json!({"k": "v"})));
        let payload = api.item_payload(project(1), PassThrough).unwrap();
        assert_eq!(payload["meta"], json!({"k": "v"}));
        assert!(api.meta().is_empty());
    }

    #[test]
    fn api_request_classification_uses_request_path() {
        assert!(builder().is_api_request());
        let other = builder_with(ApiConfig::default(), RequestContext::new("/web/home"));
        assert!(!other.is_api_request());
    }
}
