//! Response shaping for JSON APIs.
//!
//! This crate turns domain values into wire-ready JSON bodies. It has two
//! halves that meet in the [`ResponseBuilder`]:
//!
//! - **Resource shaping**: a [`Transformer`] maps one value to an
//!   [`AttributeMap`] and names the related resources it can include. A
//!   [`Resource`] binds values to their transformer (as an item or a
//!   collection, optionally with meta and pagination) and a
//!   [`ResourceSerializer`] decides the envelope around the result.
//! - **Message envelopes**: fixed-shape success/error bodies rendered from
//!   configured templates by [`format_payload`].
//!
//! The builder is request scoped. It accumulates a status code, headers, and
//! one-shot meta, then emits exactly one payload through a
//! [`ResponseEmitter`]. Framework integrations supply their own emitter; the
//! default [`JsonEmitter`] produces a plain [`ApiResponse`].
//!
//! # Crate layout
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`attr`] | [`AttributeMap`] and field coercion helpers |
//! | [`transformer`] | The [`Transformer`] contract and the [`PassThrough`] fallback |
//! | [`resource`] | [`Resource`] items and collections |
//! | [`scope`] | Include negotiation and recursive serialization |
//! | [`serializer`] | Envelope strategies ([`ArraySerializer`], [`DataArraySerializer`]) |
//! | [`pagination`] | [`Paginator`] contract, [`LengthAwarePaginator`], [`PaginationInfo`] |
//! | [`format`] | Placeholder substitution for message templates |
//! | [`exception`] | [`ApiException`] and status translation |
//! | [`config`] | [`ApiConfig`] |
//! | [`request`] | [`RequestContext`], the per-request inputs the builder reads |
//! | [`response`] | [`ResponseBuilder`] and the emitter seam |
//! | [`envelope`] | Typed views of the default success/error bodies |
//!
//! # Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use apishape::{attr, ApiConfig, PassThrough, RequestContext, ResponseBuilder};
//! use serde_json::json;
//!
//! let config = Arc::new(ApiConfig::default());
//! let mut api = ResponseBuilder::new(config, RequestContext::new("/v1/users"));
//!
//! let response = api
//!     .set_meta(attr::object(json!({"foo": "bar"})))
//!     .respond_item(user, PassThrough)?;
//! assert_eq!(response.status, 200);
//! ```

pub mod attr;
pub mod config;
pub mod envelope;
pub mod error;
pub mod exception;
pub mod format;
pub mod pagination;
pub mod request;
pub mod resource;
pub mod response;
pub mod scope;
pub mod serializer;
pub mod transformer;

pub use attr::{AttributeMap, TimestampFormat};
pub use config::{ApiConfig, ConfigError, SerializerKind};
pub use envelope::{EnvelopeBody, ErrorEnvelope, SuccessEnvelope};
pub use error::ShapeError;
pub use exception::{translate_status, ApiException, ErrorKind};
pub use format::format_payload;
pub use pagination::{LengthAwarePaginator, PaginationInfo, PaginationLinks, Paginator};
pub use request::RequestContext;
pub use resource::Resource;
pub use response::{
    encode_body, ApiResponse, Created, ErrorPayload, Headers, JsonEmitter, ResponseBuilder,
    ResponseEmitter,
};
pub use scope::{IncludeSet, Scope};
pub use serializer::{ArraySerializer, DataArraySerializer, ResourceSerializer};
pub use transformer::{PassThrough, Transformer};
