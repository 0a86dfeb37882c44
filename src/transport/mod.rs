//! Network transport behind the terminal stage.
//!
//! # Data Flow
//! ```text
//! TransportStage
//!     → builds TransportRequest (method, url, headers, encoded body)
//!     → Transport::execute (client.rs in production, mocks in tests)
//!     → TransportResponse or TransportError
//!     → TransportStage maps the error into the pipeline taxonomy
//! ```
//!
//! # Design Decisions
//! - The transport sees a fully resolved URL and raw bytes; it knows nothing
//!   about stages or options
//! - Failures are classified once here, so the pipeline never matches on
//!   backend-specific error types

use std::fmt;

use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, Method};
use thiserror::Error;
use url::Url;

use crate::concurrency::Cancellation;
use crate::http::{BoxError, ErrorKind, HttpError, Request, Status};

pub mod client;

pub use client::ReqwestTransport;

/// A request ready to go on the wire.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

/// What came back from the peer.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: Status,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

impl TransportResponse {
    pub fn new(status: impl Into<Status>) -> Self {
        Self {
            status: status.into(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// Classification of a failed exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportErrorCode {
    Connect,
    Timeout,
    Request,
    Body,
    Decode,
    Redirect,
}

impl TransportErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportErrorCode::Connect => "connect",
            TransportErrorCode::Timeout => "timeout",
            TransportErrorCode::Request => "request",
            TransportErrorCode::Body => "body",
            TransportErrorCode::Decode => "decode",
            TransportErrorCode::Redirect => "redirect",
        }
    }
}

impl fmt::Display for TransportErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors a transport may report.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("exchange cancelled")]
    Cancelled,

    #[error("invalid response: {0}")]
    InvalidResponse(#[source] BoxError),

    #[error("{code} failure: {source}")]
    Failed {
        code: TransportErrorCode,
        #[source]
        source: BoxError,
    },

    #[error("{0}")]
    Other(BoxError),
}

impl TransportError {
    pub fn failed(code: TransportErrorCode, source: impl Into<BoxError>) -> Self {
        TransportError::Failed {
            code,
            source: source.into(),
        }
    }

    /// Translate into a pipeline error for `request`.
    pub fn into_http_error(self, request: Request) -> HttpError {
        match self {
            TransportError::Cancelled => HttpError::new(ErrorKind::Cancelled, request),
            TransportError::InvalidResponse(source) => {
                HttpError::new(ErrorKind::InvalidResponse, request).with_source(source)
            }
            TransportError::Failed { code, source } => {
                HttpError::new(ErrorKind::Transport(code), request).with_source(source)
            }
            TransportError::Other(source) => {
                HttpError::new(ErrorKind::Unknown, request).with_source(source)
            }
        }
    }
}

/// Performs one HTTP exchange.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `request` and wait for the response.
    ///
    /// Implementations should stop early when `cancellation` fires; the
    /// terminal stage also races the call against it.
    async fn execute(
        &self,
        request: TransportRequest,
        cancellation: &Cancellation,
    ) -> Result<TransportResponse, TransportError>;
}
