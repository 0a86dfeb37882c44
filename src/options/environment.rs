//! Server environment option.

use http::HeaderMap;

use crate::http::Request;
use crate::options::RequestOption;

/// Default host, path prefix and headers for a target server.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerEnvironment {
    host: String,
    path_prefix: String,
    headers: HeaderMap,
}

impl ServerEnvironment {
    /// Create an environment for `host` with a `/` prefix and no headers.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            path_prefix: "/".to_string(),
            headers: HeaderMap::new(),
        }
    }

    /// Set the path prefix. A leading `/` is added when missing.
    pub fn with_path_prefix(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        self.path_prefix = if prefix.starts_with('/') {
            prefix
        } else {
            format!("/{prefix}")
        };
        self
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn path_prefix(&self) -> &str {
        &self.path_prefix
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Join the prefix and a relative path with exactly one separator.
    pub fn prefixed(&self, path: &str) -> String {
        if self.path_prefix.ends_with('/') {
            format!("{}{}", self.path_prefix, path)
        } else {
            format!("{}/{}", self.path_prefix, path)
        }
    }
}

/// By default no environment is attached to a request.
impl RequestOption for ServerEnvironment {
    type Value = Option<ServerEnvironment>;

    fn default_value() -> Self::Value {
        None
    }
}

impl Request {
    /// The environment attached to this request, if any.
    pub fn server_environment(&self) -> Option<ServerEnvironment> {
        self.option::<ServerEnvironment>()
    }

    pub fn set_server_environment(&mut self, environment: Option<ServerEnvironment>) {
        self.set_option::<ServerEnvironment>(environment);
    }
}
