//! The transformer contract.
//!
//! A [`Transformer`] is a pure mapping from one domain value to its output
//! attributes, plus a set of named includes that produce related
//! [`Resource`]s on demand.

use serde::Serialize;
use serde_json::Value;

use crate::attr::AttributeMap;
use crate::error::ShapeError;
use crate::resource::Resource;

/// Maps values of type `T` to their public representation.
///
/// # Includes
///
/// - [`available_includes`](Transformer::available_includes) may be requested
///   by the client (`?include=manager`).
/// - [`default_includes`](Transformer::default_includes) are always applied
///   unless the client excludes them (`?exclude=manager`).
///
/// Every name in either list must be handled by
/// [`include`](Transformer::include). Returning `Ok(None)` means the related
/// value is absent and renders as `null`.
///
/// ```rust,ignore
/// struct PostTransformer;
///
/// impl Transformer<Post> for PostTransformer {
///     fn transform(&self, post: &Post) -> AttributeMap {
///         attr::object(json!({ "id": post.id, "title": post.title }))
///     }
///
///     fn default_includes(&self) -> &[&'static str] {
///         &["author"]
///     }
///
///     fn include(&self, name: &str, post: &Post) -> Result<Option<Resource>, ShapeError> {
///         match name {
///             "author" => Ok(post.author.clone().map(|a| Resource::item(a, AuthorTransformer))),
///             other => Err(ShapeError::UnknownInclude(other.to_string())),
///         }
///     }
/// }
/// ```
pub trait Transformer<T>: Send + Sync {
    /// Produce the flat attribute map for `value`.
    fn transform(&self, value: &T) -> AttributeMap;

    /// Includes a client may ask for.
    fn available_includes(&self) -> &[&'static str] {
        &[]
    }

    /// Includes applied unless explicitly excluded.
    fn default_includes(&self) -> &[&'static str] {
        &[]
    }

    /// Build the related resource named `name`.
    fn include(&self, name: &str, value: &T) -> Result<Option<Resource>, ShapeError> {
        let _ = value;
        Err(ShapeError::UnknownInclude(name.to_string()))
    }
}

/// Closures work as include-less transformers.
impl<T, F> Transformer<T> for F
where
    F: Fn(&T) -> AttributeMap + Send + Sync,
{
    fn transform(&self, value: &T) -> AttributeMap {
        self(value)
    }
}

/// Fallback transformer: serializes the value as-is.
///
/// Used wherever the caller has no dedicated transformer. Structs become
/// their serde field map; `null` becomes an empty map; any other scalar or
/// array is placed under a single `"value"` key.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

impl<T: Serialize> Transformer<T> for PassThrough {
    /// # Panics
    ///
    /// Panics if `T`'s `Serialize` impl fails, which only happens for
    /// types that cannot be represented as JSON (e.g. maps with non-string
    /// keys).
    fn transform(&self, value: &T) -> AttributeMap {
        match serde_json::to_value(value) {
            Ok(Value::Object(map)) => map,
            Ok(Value::Null) => AttributeMap::new(),
            Ok(other) => {
                let mut map = AttributeMap::new();
                map.insert("value".into(), other);
                map
            }
            Err(e) => panic!("pass-through transformer cannot serialize value: {e}"),
        }
    }
}
