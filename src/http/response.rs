//! Response value returned from the pipeline.

use std::fmt;

use bytes::Bytes;
use http::HeaderMap;

use crate::http::request::Request;

/// HTTP status code.
///
/// A plain wrapper so nonstandard codes round-trip unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Status(pub u16);

impl Status {
    pub const OK: Status = Status(200);
    pub const NO_CONTENT: Status = Status(204);
    pub const NOT_FOUND: Status = Status(404);
    pub const INTERNAL_SERVER_ERROR: Status = Status(500);

    pub fn as_u16(&self) -> u16 {
        self.0
    }

    /// Whether the code is in the 2xx class.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.0)
    }
}

impl From<u16> for Status {
    fn from(code: u16) -> Self {
        Self(code)
    }
}

impl From<Status> for u16 {
    fn from(status: Status) -> Self {
        status.0
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A received response together with the request that produced it.
#[derive(Debug, Clone)]
pub struct Response {
    request: Request,
    status: Status,
    headers: HeaderMap,
    body: Option<Bytes>,
}

impl Response {
    /// Create a response with no headers and no body.
    pub fn new(request: Request, status: impl Into<Status>) -> Self {
        Self {
            request,
            status: status.into(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_body(mut self, body: Option<Bytes>) -> Self {
        self.body = body;
        self
    }

    /// The request exactly as it was sent.
    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Split into the originating request and the body.
    pub fn into_parts(self) -> (Request, Status, HeaderMap, Option<Bytes>) {
        (self.request, self.status, self.headers, self.body)
    }
}
