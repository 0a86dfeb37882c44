//! Request body encoders.
//!
//! # Responsibilities
//! - Describe whether a body carries data
//! - Contribute headers implied by the encoding (e.g. `Content-Type`)
//! - Encode the body to bytes for a specific request
//!
//! # Design Decisions
//! - Encoding is deferred until the terminal stage, so a failure is always
//!   reported against the request that was actually being sent
//! - JSON bodies capture the value and serialize lazily

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use http::header::{HeaderValue, CONTENT_TYPE};
use http::HeaderMap;
use serde::Serialize;
use thiserror::Error;

use crate::http::request::Request;

/// Errors raised while encoding a request body.
#[derive(Debug, Error)]
pub enum EncodingError {
    /// The value could not be serialized to JSON.
    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Any other encoder-specific failure.
    #[error("body encoding failed: {0}")]
    Other(String),
}

/// A type that can serve as the body of a request.
pub trait Body: fmt::Debug + Send + Sync {
    /// Whether this body contains any data.
    fn is_empty(&self) -> bool;

    /// Headers to add to the request when this body is sent.
    fn additional_headers(&self) -> HeaderMap {
        HeaderMap::new()
    }

    /// Encode the body for the given request.
    fn encode(&self, request: &Request) -> Result<Bytes, EncodingError>;
}

/// A body with no content.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyBody;

impl Body for EmptyBody {
    fn is_empty(&self) -> bool {
        true
    }

    fn encode(&self, _request: &Request) -> Result<Bytes, EncodingError> {
        Ok(Bytes::new())
    }
}

type JsonEncoder = dyn Fn() -> Result<Vec<u8>, serde_json::Error> + Send + Sync;

/// A JSON-encoded body.
#[derive(Clone)]
pub struct JsonBody {
    encoder: Arc<JsonEncoder>,
}

impl JsonBody {
    pub fn new<T>(value: T) -> Self
    where
        T: Serialize + Send + Sync + 'static,
    {
        Self {
            encoder: Arc::new(move || serde_json::to_vec(&value)),
        }
    }
}

impl fmt::Debug for JsonBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonBody").finish_non_exhaustive()
    }
}

impl Body for JsonBody {
    fn is_empty(&self) -> bool {
        false
    }

    fn additional_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }

    fn encode(&self, _request: &Request) -> Result<Bytes, EncodingError> {
        Ok(Bytes::from((self.encoder)()?))
    }
}

/// A form-urlencoded body.
#[derive(Debug, Clone, Default)]
pub struct FormBody {
    pairs: Vec<(String, String)>,
}

impl FormBody {
    pub fn new<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl Body for FormBody {
    fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    fn additional_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded"),
        );
        headers
    }

    fn encode(&self, _request: &Request) -> Result<Bytes, EncodingError> {
        let encoded = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(&self.pairs)
            .finish();
        Ok(Bytes::from(encoded))
    }
}

/// A body backed by raw bytes.
#[derive(Debug, Clone, Default)]
pub struct DataBody {
    data: Bytes,
    headers: HeaderMap,
}

impl DataBody {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            headers: HeaderMap::new(),
        }
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }
}

impl Body for DataBody {
    fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn additional_headers(&self) -> HeaderMap {
        self.headers.clone()
    }

    fn encode(&self, _request: &Request) -> Result<Bytes, EncodingError> {
        Ok(self.data.clone())
    }
}
