//! Resources: domain values bound to the transformer that shapes them.
//!
//! A [`Resource`] is either a single item or an ordered collection. It
//! erases the value's concrete type so that a transformer can return related
//! resources of unrelated types from its includes.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::attr::AttributeMap;
use crate::error::ShapeError;
use crate::pagination::PaginationInfo;
use crate::transformer::{PassThrough, Transformer};

/// One value paired with its transformer, with the concrete type erased.
pub(crate) trait Shaped: Send {
    fn attributes(&self) -> AttributeMap;
    fn available_includes(&self) -> &[&'static str];
    fn default_includes(&self) -> &[&'static str];
    fn include(&self, name: &str) -> Result<Option<Resource>, ShapeError>;
}

struct Bound<T> {
    value: T,
    transformer: Arc<dyn Transformer<T>>,
}

impl<T: Send> Shaped for Bound<T> {
    fn attributes(&self) -> AttributeMap {
        self.transformer.transform(&self.value)
    }

    fn available_includes(&self) -> &[&'static str] {
        self.transformer.available_includes()
    }

    fn default_includes(&self) -> &[&'static str] {
        self.transformer.default_includes()
    }

    fn include(&self, name: &str) -> Result<Option<Resource>, ShapeError> {
        self.transformer.include(name, &self.value)
    }
}

pub(crate) enum ResourceData {
    Item(Box<dyn Shaped>),
    Collection(Vec<Box<dyn Shaped>>),
}

/// An item or collection ready to be serialized.
///
/// Optional `meta` is emitted under the `meta` key next to the data, and an
/// attached [`PaginationInfo`] appears as `meta.pagination`. The two coexist.
pub struct Resource {
    pub(crate) data: ResourceData,
    pub(crate) meta: AttributeMap,
    pub(crate) pagination: Option<PaginationInfo>,
}

impl Resource {
    /// A single value shaped by `transformer`.
    pub fn item<T, X>(value: T, transformer: X) -> Self
    where
        T: Send + 'static,
        X: Transformer<T> + 'static,
    {
        Self::item_shared(value, Arc::new(transformer))
    }

    /// Like [`item`](Resource::item) with a transformer already behind an `Arc`.
    pub fn item_shared<T>(value: T, transformer: Arc<dyn Transformer<T>>) -> Self
    where
        T: Send + 'static,
    {
        Self::from_data(ResourceData::Item(Box::new(Bound { value, transformer })))
    }

    /// A single value serialized as-is through [`PassThrough`].
    pub fn plain<T>(value: T) -> Self
    where
        T: Serialize + Send + 'static,
    {
        Self::item(value, PassThrough)
    }

    /// An ordered collection sharing one transformer.
    pub fn collection<T, X, I>(values: I, transformer: X) -> Self
    where
        T: Send + 'static,
        X: Transformer<T> + 'static,
        I: IntoIterator<Item = T>,
    {
        Self::collection_shared(values, Arc::new(transformer))
    }

    /// Like [`collection`](Resource::collection) with a shared transformer.
    pub fn collection_shared<T, I>(values: I, transformer: Arc<dyn Transformer<T>>) -> Self
    where
        T: Send + 'static,
        I: IntoIterator<Item = T>,
    {
        let items = values
            .into_iter()
            .map(|value| {
                Box::new(Bound {
                    value,
                    transformer: Arc::clone(&transformer),
                }) as Box<dyn Shaped>
            })
            .collect();
        Self::from_data(ResourceData::Collection(items))
    }

    fn from_data(data: ResourceData) -> Self {
        Self {
            data,
            meta: AttributeMap::new(),
            pagination: None,
        }
    }

    /// Attach meta, replacing any set before.
    pub fn with_meta(mut self, meta: AttributeMap) -> Self {
        self.meta = meta;
        self
    }

    /// Merge `meta` into the resource's meta; new keys win on collision.
    pub fn merge_meta(&mut self, meta: AttributeMap) {
        self.meta.extend(meta);
    }

    /// Attach pagination details.
    pub fn with_pagination(mut self, pagination: PaginationInfo) -> Self {
        self.pagination = Some(pagination);
        self
    }

    pub fn is_collection(&self) -> bool {
        matches!(self.data, ResourceData::Collection(_))
    }

    /// Number of values held: 1 for an item.
    pub fn len(&self) -> usize {
        match &self.data {
            ResourceData::Item(_) => 1,
            ResourceData::Collection(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn meta(&self) -> &AttributeMap {
        &self.meta
    }

    pub fn pagination(&self) -> Option<&PaginationInfo> {
        self.pagination.as_ref()
    }
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_collection() { "Collection" } else { "Item" };
        f.debug_struct("Resource")
            .field("kind", &kind)
            .field("len", &self.len())
            .field("meta", &self.meta)
            .field("pagination", &self.pagination)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn item_and_collection_report_their_shape() {
        let item = Resource::plain(json!({"id": 1}));
        assert!(!item.is_collection());
        assert_eq!(item.len(), 1);

        let coll = Resource::collection(vec![1u32, 2, 3], PassThrough);
        assert!(coll.is_collection());
        assert_eq!(coll.len(), 3);

        let empty = Resource::collection(Vec::<u32>::new(), PassThrough);
        assert!(empty.is_empty());
    }

    #[test]
    fn merge_meta_overrides_existing_keys() {
        let mut r = Resource::plain(1u8).with_meta(crate::attr::object(json!({"a": 1, "b": 1})));
        r.merge_meta(crate::attr::object(json!({"b": 2})));
        assert_eq!(r.meta().get("a"), Some(&json!(1)));
        assert_eq!(r.meta().get("b"), Some(&json!(2)));
    }
}
