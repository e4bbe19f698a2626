//! Request descriptors.

use crate::error::{Error, Result};
use reqwest::{Method, Url};
use serde::Serialize;
use serde_json::Value;

/// A single API call: method, endpoint path, query and optional JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    method: Method,
    path: String,
    segments: Vec<String>,
    query: Vec<(String, String)>,
    body: Option<Value>,
}

impl Request {
    /// Creates a request for `path`, relative to the client's base URL.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            segments: Vec::new(),
            query: Vec::new(),
            body: None,
        }
    }

    /// `GET path`.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// `POST path`.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Appends one path segment, percent-encoded.
    #[must_use]
    pub fn segment(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    /// Adds a query parameter.
    #[must_use]
    pub fn query(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((name.into(), value.to_string()));
        self
    }

    /// Adds a query parameter when `value` is present.
    #[must_use]
    pub fn query_opt(self, name: impl Into<String>, value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => self.query(name, value),
            None => self,
        }
    }

    /// Sets the JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unknown`] if `body` cannot be represented as JSON.
    pub fn json(mut self, body: &impl Serialize) -> Result<Self> {
        self.body = Some(serde_json::to_value(body).map_err(Error::unknown)?);
        Ok(self)
    }

    /// HTTP method.
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Endpoint path, excluding appended segments.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Query parameters in insertion order.
    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    /// JSON body, if any.
    pub const fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Resolves the full URL against `base`.
    pub(crate) fn url(&self, base: &str) -> Result<Url> {
        let mut url = Url::parse(&format!("{base}{}", self.path)).map_err(Error::unknown)?;
        if !self.segments.is_empty() {
            url.path_segments_mut()
                .map_err(|()| Error::unknown(format!("cannot append path segments to {base}")))?
                .pop_if_empty()
                .extend(&self.segments);
        }
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&self.query);
        }
        Ok(url)
    }
}
