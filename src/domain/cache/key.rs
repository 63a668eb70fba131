//! Request key generation

use std::collections::BTreeMap;
use std::fmt;

/// Canonical identifier of a cacheable request: endpoint path plus query
///
/// Query parameters are kept sorted so the same logical request always
/// renders the same key, regardless of the order parameters were added in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestKey {
    path: String,
    params: BTreeMap<String, String>,
    rendered: String,
}

impl RequestKey {
    /// Creates a key for a path without query parameters
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        let rendered = path.clone();

        Self {
            path,
            params: BTreeMap::new(),
            rendered,
        }
    }

    /// Adds a query parameter to the key
    pub fn with_param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.insert(key.into(), value.to_string());
        self.rendered = Self::render(&self.path, &self.params);
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }

    /// Returns the string form used for cache lookups and URLs
    pub fn as_str(&self) -> &str {
        &self.rendered
    }

    /// True if the key's path starts with the given prefix
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.path.starts_with(prefix)
    }

    fn render(path: &str, params: &BTreeMap<String, String>) -> String {
        if params.is_empty() {
            return path.to_string();
        }

        let query: Vec<String> = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();

        format!("{}?{}", path, query.join("&"))
    }
}

impl fmt::Display for RequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rendered)
    }
}

impl From<&str> for RequestKey {
    fn from(value: &str) -> Self {
        match value.split_once('?') {
            Some((path, query)) => query
                .split('&')
                .filter(|pair| !pair.is_empty())
                .fold(Self::new(path), |key, pair| match pair.split_once('=') {
                    Some((k, v)) => key.with_param(k, v),
                    None => key.with_param(pair, ""),
                }),
            None => Self::new(value),
        }
    }
}
