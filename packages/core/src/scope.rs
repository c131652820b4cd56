//! Include negotiation and the recursive walk that serializes a resource.
//!
//! Include paths use dot notation: `manager.contact` asks for the `contact`
//! include inside the `manager` include. Requesting a nested path implies
//! its parents. Exclusions match one exact path and apply only to defaults
//! and requests at that depth.

use std::collections::BTreeSet;

use crate::attr::AttributeMap;
use crate::error::ShapeError;
use crate::resource::{Resource, ResourceData, Shaped};
use crate::serializer::ResourceSerializer;

/// Nested include paths deeper than this are ignored.
pub const MAX_INCLUDE_DEPTH: usize = 10;

/// Include and exclude paths requested by the client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncludeSet {
    requested: BTreeSet<String>,
    excluded: BTreeSet<String>,
}

impl IncludeSet {
    /// Parse comma-separated `include` / `exclude` parameter values.
    ///
    /// Whitespace around names is ignored, as is any `:modifier` suffix.
    pub fn parse(include: Option<&str>, exclude: Option<&str>) -> Self {
        let mut set = Self::default();
        for path in split_paths(include) {
            let segments: Vec<&str> = path.split('.').collect();
            for depth in 1..=segments.len() {
                set.requested.insert(segments[..depth].join("."));
            }
        }
        set.excluded.extend(split_paths(exclude).map(str::to_string));
        set
    }

    pub fn is_requested(&self, path: &str) -> bool {
        self.requested.contains(path)
    }

    pub fn is_excluded(&self, path: &str) -> bool {
        self.excluded.contains(path)
    }

    pub fn is_empty(&self) -> bool {
        self.requested.is_empty() && self.excluded.is_empty()
    }
}

fn split_paths(raw: Option<&str>) -> impl Iterator<Item = &str> {
    raw.unwrap_or("")
        .split(',')
        .map(|p| p.split(':').next().unwrap_or("").trim())
        .filter(|p| !p.is_empty() && p.split('.').all(|s| !s.is_empty()))
        .filter(|p| p.split('.').count() <= MAX_INCLUDE_DEPTH)
}

/// One level of the serialization walk.
///
/// The root scope has no path; each include opens a child scope whose path
/// is the dotted chain of include names leading to it.
pub struct Scope<'a> {
    includes: &'a IncludeSet,
    serializer: &'a dyn ResourceSerializer,
    path: Option<String>,
}

impl<'a> Scope<'a> {
    pub fn root(includes: &'a IncludeSet, serializer: &'a dyn ResourceSerializer) -> Self {
        Self {
            includes,
            serializer,
            path: None,
        }
    }

    /// Dotted path of this scope; `None` at the root.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    fn qualified(&self, name: &str) -> String {
        match &self.path {
            Some(path) => format!("{path}.{name}"),
            None => name.to_string(),
        }
    }

    fn child(&self, name: &str) -> Scope<'a> {
        Scope {
            includes: self.includes,
            serializer: self.serializer,
            path: Some(self.qualified(name)),
        }
    }

    /// Serialize `resource` and everything it includes.
    pub fn serialize(&self, resource: Resource) -> Result<AttributeMap, ShapeError> {
        let Resource {
            data,
            mut meta,
            pagination,
        } = resource;

        let mut out = match data {
            ResourceData::Item(item) => self.serializer.item(self.shape(item.as_ref())?),
            ResourceData::Collection(items) => {
                let shaped = items
                    .iter()
                    .map(|item| self.shape(item.as_ref()))
                    .collect::<Result<Vec<_>, _>>()?;
                self.serializer.collection(shaped)
            }
        };

        if let Some(pagination) = &pagination {
            meta.extend(self.serializer.pagination(pagination));
        }
        out.extend(self.serializer.meta(meta));
        Ok(out)
    }

    fn shape(&self, item: &dyn Shaped) -> Result<AttributeMap, ShapeError> {
        let mut data = item.attributes();
        for name in self.includes_for(item) {
            let value = match item.include(name)? {
                Some(related) => serde_json::Value::Object(self.child(name).serialize(related)?),
                None => serde_json::Value::Null,
            };
            data.insert(name.to_string(), value);
        }
        Ok(data)
    }

    /// Defaults first in declared order, then requested available includes.
    fn includes_for(&self, item: &dyn Shaped) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = Vec::new();
        for &name in item.default_includes() {
            if !self.includes.is_excluded(&self.qualified(name)) && !names.contains(&name) {
                names.push(name);
            }
        }
        for &name in item.available_includes() {
            let path = self.qualified(name);
            if self.includes.is_requested(&path)
                && !self.includes.is_excluded(&path)
                && !names.contains(&name)
            {
                names.push(name);
            }
        }
        names
    }
}
