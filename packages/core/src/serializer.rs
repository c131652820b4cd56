//! Envelope strategies for serialized resources.
//!
//! A [`ResourceSerializer`] decides how transformed data is wrapped. The
//! strategy is a deployment choice made through
//! [`ApiConfig::serializer`](crate::ApiConfig::serializer).
//!
//! | Strategy | Item | Collection |
//! |----------|------|------------|
//! | [`ArraySerializer`] | `{...attributes}` | `{"data": [...]}` |
//! | [`DataArraySerializer`] | `{"data": {...}}` | `{"data": [...]}` |

use std::fmt::Debug;

use serde_json::Value;

use crate::attr::AttributeMap;
use crate::pagination::PaginationInfo;

/// Key under which collections (and data-wrapped items) are placed.
pub const DATA_KEY: &str = "data";

/// Key under which resource meta is placed.
pub const META_KEY: &str = "meta";

pub trait ResourceSerializer: Debug + Send + Sync {
    /// Wrap one transformed item.
    fn item(&self, data: AttributeMap) -> AttributeMap;

    /// Wrap an ordered list of transformed items.
    fn collection(&self, data: Vec<AttributeMap>) -> AttributeMap {
        let mut out = AttributeMap::new();
        out.insert(
            DATA_KEY.into(),
            Value::Array(data.into_iter().map(Value::Object).collect()),
        );
        out
    }

    /// Wrap resource meta; an empty map yields no `meta` key at all.
    fn meta(&self, meta: AttributeMap) -> AttributeMap {
        let mut out = AttributeMap::new();
        if !meta.is_empty() {
            out.insert(META_KEY.into(), Value::Object(meta));
        }
        out
    }

    /// Render pagination details, merged into meta by the caller.
    fn pagination(&self, pagination: &PaginationInfo) -> AttributeMap {
        let mut out = AttributeMap::new();
        out.insert("pagination".into(), Value::Object(pagination.to_map()));
        out
    }
}

/// Items are emitted bare; collections go under `data`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArraySerializer;

impl ResourceSerializer for ArraySerializer {
    fn item(&self, data: AttributeMap) -> AttributeMap {
        data
    }
}

/// Items and collections both go under `data`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataArraySerializer;

impl ResourceSerializer for DataArraySerializer {
    fn item(&self, data: AttributeMap) -> AttributeMap {
        let mut out = AttributeMap::new();
        out.insert(DATA_KEY.into(), Value::Object(data));
        out
    }
}
