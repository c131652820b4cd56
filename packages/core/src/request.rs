//! The slice of the incoming request the builder depends on.
//!
//! Integrations build a [`RequestContext`] from their own request type and
//! hand it to the [`ResponseBuilder`](crate::ResponseBuilder). Nothing here
//! reads process-global state.

use std::sync::LazyLock;

use regex::Regex;

use crate::pagination::PAGE_PARAM;
use crate::scope::IncludeSet;

/// Query parameter naming the JSONP callback.
pub const CALLBACK_PARAM: &str = "callback";
/// Query parameter listing includes to add.
pub const INCLUDE_PARAM: &str = "include";
/// Query parameter listing includes to drop.
pub const EXCLUDE_PARAM: &str = "exclude";

static CALLBACK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*(?:\.[A-Za-z_$][A-Za-z0-9_$]*)*$")
        .expect("static callback regex is valid")
});

/// Path, host, and decoded query of the request being answered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    path: String,
    host: Option<String>,
    query: Vec<(String, String)>,
}

impl RequestContext {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            host: None,
            query: Vec::new(),
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Replace the query with already-decoded pairs, in request order.
    pub fn with_query<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.query = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self
    }

    /// Replace the query by parsing a raw `application/x-www-form-urlencoded`
    /// query string (without the leading `?`).
    pub fn with_query_string(mut self, raw: &str) -> Self {
        self.query = parse_query(raw);
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    /// Value of query parameter `key`; the last occurrence wins.
    pub fn input(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Query parameters to carry on pagination links: everything except
    /// `page`, each key once, in first-seen order, with its last value.
    pub fn preserved_query(&self) -> Vec<(String, String)> {
        let mut out: Vec<(String, String)> = Vec::new();
        for (k, v) in &self.query {
            if k == PAGE_PARAM {
                continue;
            }
            match out.iter_mut().find(|(existing, _)| existing == k) {
                Some((_, value)) => *value = v.clone(),
                None => out.push((k.clone(), v.clone())),
            }
        }
        out
    }

    /// The JSONP callback, if present and a valid (dotted) JS identifier.
    pub fn callback(&self) -> Option<&str> {
        let callback = self.input(CALLBACK_PARAM)?;
        if CALLBACK_RE.is_match(callback) {
            Some(callback)
        } else {
            tracing::warn!(callback, "ignoring invalid JSONP callback");
            None
        }
    }

    /// Includes and excludes the client asked for.
    pub fn includes(&self) -> IncludeSet {
        IncludeSet::parse(self.input(INCLUDE_PARAM), self.input(EXCLUDE_PARAM))
    }
}

/// Decode a query string into ordered pairs. `+` is a space; malformed
/// percent escapes are kept verbatim.
pub fn parse_query(raw: &str) -> Vec<(String, String)> {
    raw.split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
            (decode(k), decode(v))
        })
        .collect()
}

fn decode(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => spaced,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_decodes_query_string() {
        let ctx = RequestContext::new("/v1/p").with_query_string("sort=asc&q=a+b%26c&flag&page=3");
        assert_eq!(ctx.input("sort"), Some("asc"));
        assert_eq!(ctx.input("q"), Some("a b&c"));
        assert_eq!(ctx.input("flag"), Some(""));
        assert_eq!(ctx.input("page"), Some("3"));
        assert_eq!(ctx.input("missing"), None);
    }

    #[test]
    fn preserved_query_drops_page_only() {
        let ctx = RequestContext::new("/v1/p").with_query([("sort", "asc"), ("page", "3"), ("sort", "desc")]);
        assert_eq!(ctx.preserved_query(), vec![("sort".to_string(), "desc".to_string())]);
    }

    #[test]
    fn callback_must_be_an_identifier() {
        let ok = RequestContext::new("/").with_query([("callback", "jQuery.cb_1")]);
        assert_eq!(ok.callback(), Some("jQuery.cb_1"));
        let bad = RequestContext::new("/").with_query([("callback", "alert(1)")]);
        assert_eq!(bad.callback(), None);
        assert_eq!(RequestContext::new("/").callback(), None);
    }

    #[test]
    fn includes_come_from_query() {
        let ctx = RequestContext::new("/").with_query([("include", "manager"), ("exclude", "tags")]);
        let set = ctx.includes();
        assert!(set.is_requested("manager"));
        assert!(set.is_excluded("tags"));
    }
}
