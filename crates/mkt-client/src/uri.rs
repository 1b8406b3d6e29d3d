//! Fluent request-URL composition.

use url::Url;

use crate::error::{Error, ErrorKind, Result};

/// Fluent builder for well-formed request URLs.
///
/// Path segments are percent-encoded and appended in call order; query keys
/// are unique per call with last write winning. Pure data transformation.
#[derive(Debug, Clone)]
pub struct UriBuilder {
    url: Url,
    query: Vec<(String, String)>,
}

impl UriBuilder {
    /// Start building from a base URI string.
    ///
    /// Fails with `InvalidBaseUri` if `base` is not absolute.
    pub fn start(base: &str) -> Result<Self> {
        let url = Url::parse(base)
            .map_err(|e| Error::with_source(ErrorKind::InvalidBaseUri(base.to_string()), e))?;
        Self::from_base(url)
    }

    /// Start building from an already-parsed base URL.
    ///
    /// Fails with `InvalidBaseUri` for URLs that cannot carry path segments
    /// (e.g. `mailto:`).
    pub fn from_base(url: Url) -> Result<Self> {
        if url.cannot_be_a_base() {
            return Err(Error::new(ErrorKind::InvalidBaseUri(url.to_string())));
        }
        Ok(Self {
            url,
            query: Vec::new(),
        })
    }

    /// Append a path segment. Segments are percent-encoded and never
    /// reordered.
    pub fn add_path(mut self, segment: &str) -> Self {
        if let Ok(mut segments) = self.url.path_segments_mut() {
            segments.pop_if_empty().push(segment);
        }
        self
    }

    /// Add a query parameter. A repeated key replaces the earlier value.
    pub fn add_query(mut self, key: &str, value: &str) -> Self {
        self.query.retain(|(k, _)| k != key);
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Build the final URL.
    pub fn build(mut self) -> Url {
        if !self.query.is_empty() {
            let mut pairs = self.url.query_pairs_mut();
            for (key, value) in &self.query {
                pairs.append_pair(key, value);
            }
        }
        self.url
    }
}
