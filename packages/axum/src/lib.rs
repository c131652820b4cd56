//! axum integration for [`apishape`].
//!
//! Handlers take an [`Api`] extractor, a per-request
//! [`ResponseBuilder`](apishape::ResponseBuilder) whose emitter produces
//! [`axum::response::Response`] values. Fallible work goes in a
//! `Result<Response, E>` and is handed to [`Api::finish`], which renders
//! any failure with the deployment's error template, default headers and
//! JSONP callback.
//!
//! ```rust,ignore
//! async fn show(mut api: Api, Path(id): Path<u64>) -> Response {
//!     let outcome = async {
//!         let project = store.find(id).await.map_err(ApiException::from)?;
//!         Ok::<_, ApiError>(api.respond_item(project, ProjectTransformer::new(fmt))?)
//!     }
//!     .await;
//!     api.finish(outcome)
//! }
//!
//! let app = Router::new()
//!     .route("/v1/projects/{id}", get(show))
//!     .fallback(route_not_found)
//!     .with_state(Arc::new(ApiConfig::from_env()?));
//! ```
//!
//! [`ApiError`] also implements `IntoResponse`, but that path only knows
//! the stock config. Prefer [`Api::finish`] or [`Api::fail`].
//!
//! The router state must provide an `Arc<ApiConfig>` via [`FromRef`](axum::extract::FromRef).

pub mod emitter;
pub mod error;
pub mod extract;
pub mod method;
pub mod validation;

pub use emitter::AxumEmitter;
pub use error::ApiError;
pub use extract::{route_not_found, Api};
pub use method::{is_delete_method, is_update_method, parse_override, METHOD_OVERRIDE_HEADER, METHOD_OVERRIDE_PARAM};
pub use validation::{Rule, Rules, ValidationErrors};
