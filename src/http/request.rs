//! Outbound request value.
//!
//! # Responsibilities
//! - Assign a process-unique request ID at construction
//! - Hold method, URI parts, headers, body and per-request options
//! - Assemble the URI parts into a full URL on demand
//!
//! # Design Decisions
//! - URI parts stay separate until the terminal stage needs a URL, so stages
//!   can fill in a missing host or prefix a relative path
//! - An incomplete request (no host, relative path) is a valid state;
//!   `url()` reports it as `None` instead of failing construction
//! - The body is shared behind an `Arc`; cloning a request never re-encodes

use std::fmt;
use std::sync::Arc;

use http::header::{HeaderName, HeaderValue};
use http::{HeaderMap, Method};
use url::Url;
use uuid::Uuid;

use crate::http::body::{Body, EmptyBody};
use crate::options::{OptionStore, RequestOption};

/// Unique identifier for a request, used for log correlation only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Generate a new random request ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// An HTTP request travelling through the pipeline.
///
/// Stages receive requests by value. To change a request a stage adjusts its
/// own copy and forwards that; earlier stages never observe the change.
#[derive(Clone)]
pub struct Request {
    id: RequestId,
    method: Method,
    scheme: String,
    host: Option<String>,
    port: Option<u16>,
    path: String,
    query: Option<String>,
    headers: HeaderMap,
    body: Arc<dyn Body>,
    options: OptionStore,
}

impl Request {
    /// Create a request for `path` using the `https` scheme, no host,
    /// no headers and an empty body.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            id: RequestId::new(),
            method,
            scheme: "https".to_string(),
            host: None,
            port: None,
            path: path.into(),
            query: None,
            headers: HeaderMap::new(),
            body: Arc::new(EmptyBody),
            options: OptionStore::default(),
        }
    }

    /// Shorthand for a `GET` request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Shorthand for a `POST` request.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Set a single header, replacing any previous value for that name.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Replace the whole header map.
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_body(mut self, body: impl Body + 'static) -> Self {
        self.body = Arc::new(body);
        self
    }

    /// Attach a typed option value.
    pub fn with_option<O: RequestOption>(mut self, value: O::Value) -> Self {
        self.options.set::<O>(value);
        self
    }

    pub fn id(&self) -> RequestId {
        self.id
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    pub fn set_host(&mut self, host: Option<String>) {
        self.host = host;
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn set_path(&mut self, path: impl Into<String>) {
        self.path = path.into();
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    pub fn body(&self) -> &dyn Body {
        self.body.as_ref()
    }

    /// Read a typed option, falling back to the option's declared default.
    pub fn option<O: RequestOption>(&self) -> O::Value {
        self.options.get::<O>()
    }

    /// Write a typed option, replacing any previous value.
    pub fn set_option<O: RequestOption>(&mut self, value: O::Value) {
        self.options.set::<O>(value);
    }

    pub fn options(&self) -> &OptionStore {
        &self.options
    }

    /// The fully composed URL, if the URI parts form one.
    ///
    /// Returns `None` when the host is missing or empty, the scheme does not
    /// parse, or a non-empty path does not start with `/`.
    pub fn url(&self) -> Option<Url> {
        let host = self.host.as_deref().filter(|h| !h.is_empty())?;
        if !self.path.is_empty() && !self.path.starts_with('/') {
            return None;
        }

        let mut url = Url::parse(&format!("{}://{}", self.scheme, host)).ok()?;
        if self.port.is_some() {
            url.set_port(self.port).ok()?;
        }
        url.set_path(&self.path);
        url.set_query(self.query.as_deref());
        Some(url)
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("id", &self.id)
            .field("method", &self.method)
            .field("scheme", &self.scheme)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("path", &self.path)
            .field("query", &self.query)
            .field("headers", &self.headers)
            .field("body", &self.body)
            .field("options", &self.options)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::ACCEPT;

    #[test]
    fn test_url_composition() {
        let request = Request::get("/foo")
            .with_scheme("http")
            .with_host("example.com");

        let url = request.url().unwrap();
        assert_eq!(url.as_str(), "http://example.com/foo");
    }

    #[test]
    fn test_url_with_port_and_query() {
        let request = Request::get("/search")
            .with_host("localhost")
            .with_port(8080)
            .with_query("q=rust");

        let url = request.url().unwrap();
        assert_eq!(url.as_str(), "https://localhost:8080/search?q=rust");
    }

    #[test]
    fn test_incomplete_request_has_no_url() {
        let request = Request::get("/bar");
        assert!(request.url().is_none());

        let request = Request::get("bar").with_host("example.com");
        assert!(request.url().is_none());

        let request = Request::get("/bar").with_host("");
        assert!(request.url().is_none());
    }

    #[test]
    fn test_mutators_reflect_in_url() {
        let mut request = Request::get("/bar");
        request.set_host(Some("my.api".to_string()));
        assert_eq!(request.url().unwrap().host_str(), Some("my.api"));

        request.set_path("/v2/bar");
        assert_eq!(request.url().unwrap().path(), "/v2/bar");
    }

    #[test]
    fn test_custom_method_is_representable() {
        let method = Method::from_bytes(b"PURGE").unwrap();
        let request = Request::new(method, "/cache");
        assert_eq!(request.method().as_str(), "PURGE");
    }

    #[test]
    fn test_request_ids_are_unique() {
        let a = Request::get("/");
        let b = Request::get("/");
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_clone_does_not_leak_mutation() {
        let original = Request::get("/users");
        let mut copy = original.clone();
        copy.headers_mut()
            .insert(ACCEPT, HeaderValue::from_static("text/plain"));
        copy.set_path("/v1/users");

        assert!(original.headers().is_empty());
        assert_eq!(original.path(), "/users");
        assert_eq!(copy.id(), original.id());
    }
}
