//! Length-aware pagination.
//!
//! The page math itself belongs to whatever data layer produced the page;
//! this module only needs the narrow [`Paginator`] view of it. The builder
//! feeds the current request's query parameters (minus `page`) back through
//! [`Paginator::append_query`] so navigation links keep filters and sorting.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::attr::AttributeMap;

/// Name of the query parameter that selects the page.
pub const PAGE_PARAM: &str = "page";

/// A page of results that knows the size of the whole result set.
pub trait Paginator {
    type Item;

    /// 1-based index of this page.
    fn current_page(&self) -> u64;

    fn per_page(&self) -> u64;

    /// Size of the whole result set.
    fn total(&self) -> u64;

    /// Number of items on this page.
    fn count(&self) -> u64;

    /// Index of the last page; never less than 1.
    fn last_page(&self) -> u64 {
        let per_page = self.per_page().max(1);
        self.total().div_ceil(per_page).max(1)
    }

    /// Add a query parameter carried on every generated link.
    fn append_query(&mut self, key: &str, value: &str);

    /// Absolute or path-relative URL of `page`.
    fn url(&self, page: u64) -> String;

    /// Surrender the page's items.
    fn into_items(self) -> Vec<Self::Item>;
}

/// In-memory [`Paginator`] over an already-sliced page.
#[derive(Debug, Clone, PartialEq)]
pub struct LengthAwarePaginator<T> {
    items: Vec<T>,
    total: u64,
    per_page: u64,
    current_page: u64,
    path: String,
    query: Vec<(String, String)>,
}

impl<T> LengthAwarePaginator<T> {
    /// Wrap one page of `items` out of `total`.
    ///
    /// `per_page` and `current_page` are clamped to at least 1. `path` is the
    /// base URL links are built from, e.g. `http://api.example.com/v1/posts`.
    pub fn new(
        items: Vec<T>,
        total: u64,
        per_page: u64,
        current_page: u64,
        path: impl Into<String>,
    ) -> Self {
        Self {
            items,
            total,
            per_page: per_page.max(1),
            current_page: current_page.max(1),
            path: path.into(),
            query: Vec::new(),
        }
    }

    /// Slice page `current_page` out of a complete result set.
    pub fn from_all(all: Vec<T>, per_page: u64, current_page: u64, path: impl Into<String>) -> Self {
        let per_page = per_page.max(1);
        let current_page = current_page.max(1);
        let total = all.len() as u64;
        let skip = usize::try_from((current_page - 1).saturating_mul(per_page)).unwrap_or(usize::MAX);
        let take = usize::try_from(per_page).unwrap_or(usize::MAX);
        let items = all.into_iter().skip(skip).take(take).collect();
        Self::new(items, total, per_page, current_page, path)
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl<T> Paginator for LengthAwarePaginator<T> {
    type Item = T;

    fn current_page(&self) -> u64 {
        self.current_page
    }

    fn per_page(&self) -> u64 {
        self.per_page
    }

    fn total(&self) -> u64 {
        self.total
    }

    fn count(&self) -> u64 {
        self.items.len() as u64
    }

    fn append_query(&mut self, key: &str, value: &str) {
        if key == PAGE_PARAM {
            return;
        }
        match self.query.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value.to_string(),
            None => self.query.push((key.to_string(), value.to_string())),
        }
    }

    fn url(&self, page: u64) -> String {
        let page = page.to_string();
        let query = self
            .query
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .chain(std::iter::once((PAGE_PARAM, page.as_str())))
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        let sep = if self.path.contains('?') { '&' } else { '?' };
        format!("{}{}{}", self.path, sep, query)
    }

    fn into_items(self) -> Vec<T> {
        self.items
    }
}

/// Navigation links of a page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationLinks {
    /// Present unless this is the first page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous: Option<String>,

    /// Present unless this is the last page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

/// Pagination details emitted as `meta.pagination`.
///
/// ```json
/// {
///   "total": 100, "count": 25, "per_page": 25,
///   "current_page": 2, "total_pages": 4,
///   "links": {
///     "previous": "http://api.example.com/v1/posts?sort=asc&page=1",
///     "next": "http://api.example.com/v1/posts?sort=asc&page=3"
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationInfo {
    pub total: u64,
    pub count: u64,
    pub per_page: u64,
    pub current_page: u64,
    pub total_pages: u64,
    pub links: PaginationLinks,
}

impl PaginationInfo {
    /// Capture the state of `paginator`, building links with its current
    /// query parameters.
    pub fn from_paginator<P: Paginator + ?Sized>(paginator: &P) -> Self {
        let current_page = paginator.current_page();
        let total_pages = paginator.last_page();
        let links = PaginationLinks {
            previous: (current_page > 1).then(|| paginator.url(current_page - 1)),
            next: (current_page < total_pages).then(|| paginator.url(current_page + 1)),
        };
        Self {
            total: paginator.total(),
            count: paginator.count(),
            per_page: paginator.per_page(),
            current_page,
            total_pages,
            links,
        }
    }

    pub fn to_map(&self) -> AttributeMap {
        let mut links = AttributeMap::new();
        if let Some(previous) = &self.links.previous {
            links.insert("previous".into(), Value::String(previous.clone()));
        }
        if let Some(next) = &self.links.next {
            links.insert("next".into(), Value::String(next.clone()));
        }
        let mut map = AttributeMap::new();
        map.insert("total".into(), self.total.into());
        map.insert("count".into(), self.count.into());
        map.insert("per_page".into(), self.per_page.into());
        map.insert("current_page".into(), self.current_page.into());
        map.insert("total_pages".into(), self.total_pages.into());
        map.insert("links".into(), Value::Object(links));
        map
    }
}
