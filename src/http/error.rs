//! Pipeline error taxonomy.
//!
//! # Design Decisions
//! - The set of error kinds is closed; stages pick one, they never invent more
//! - Every error carries the request it belongs to
//! - Underlying causes are kept for diagnostics and never inspected by stages
//! - `ResultExt::or_http_error` and `with_http_error` are the only places
//!   where foreign errors enter the taxonomy

use std::future::Future;

use thiserror::Error;

use crate::http::request::Request;
use crate::http::response::{Response, Status};
use crate::transport::TransportErrorCode;

/// Boxed error used for underlying causes.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result type for pipeline operations.
pub type HttpResult<T> = Result<T, HttpError>;

/// High-level error categories.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    /// The request could not be turned into a valid exchange.
    #[error("invalid request")]
    InvalidRequest,

    /// The peer replied with something that is not an HTTP response.
    #[error("invalid response")]
    InvalidResponse,

    /// The status code fell outside the accepted range.
    #[error("unacceptable status {0}")]
    InvalidStatus(Status),

    /// The pipeline was assembled incorrectly.
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    /// The transport failed with a classified code.
    #[error("transport error: {0}")]
    Transport(TransportErrorCode),

    /// The caller cancelled the request.
    #[error("request cancelled")]
    Cancelled,

    /// Anything that fits no other category.
    #[error("unknown error")]
    Unknown,
}

impl ErrorKind {
    /// Short label for metrics.
    pub fn label(&self) -> &'static str {
        match self {
            ErrorKind::InvalidRequest => "invalid_request",
            ErrorKind::InvalidResponse => "invalid_response",
            ErrorKind::InvalidStatus(_) => "invalid_status",
            ErrorKind::InvalidConfiguration { .. } => "invalid_configuration",
            ErrorKind::Transport(_) => "transport",
            ErrorKind::Cancelled => "cancelled",
            ErrorKind::Unknown => "unknown",
        }
    }
}

/// An error raised while a request travelled through the pipeline.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct HttpError {
    kind: ErrorKind,
    request: Box<Request>,
    response: Option<Box<Response>>,
    #[source]
    source: Option<BoxError>,
}

impl HttpError {
    pub fn new(kind: ErrorKind, request: Request) -> Self {
        Self {
            kind,
            request: Box::new(request),
            response: None,
            source: None,
        }
    }

    /// Shorthand for the error raised when a stage has no successor.
    pub fn missing_handler(request: Request) -> Self {
        Self::new(
            ErrorKind::InvalidConfiguration {
                reason: "Missing handler".to_string(),
            },
            request,
        )
    }

    pub fn with_response(mut self, response: Response) -> Self {
        self.response = Some(Box::new(response));
        self
    }

    pub fn with_source(mut self, source: impl Into<BoxError>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// The request that triggered the error.
    pub fn request(&self) -> &Request {
        &self.request
    }

    /// The response received before the failure, if any.
    pub fn response(&self) -> Option<&Response> {
        self.response.as_deref()
    }

    pub fn underlying(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.source.as_deref()
    }

    pub fn is_cancelled(&self) -> bool {
        self.kind == ErrorKind::Cancelled
    }
}

/// Conversion of foreign results into pipeline errors.
pub trait ResultExt<T> {
    /// Map the error into an [`HttpError`] of `kind` for `request`,
    /// keeping the original error as the source.
    fn or_http_error(self, kind: ErrorKind, request: &Request) -> HttpResult<T>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Into<BoxError>,
{
    fn or_http_error(self, kind: ErrorKind, request: &Request) -> HttpResult<T> {
        self.map_err(|err| HttpError::new(kind, request.clone()).with_source(err))
    }
}

/// Run `operation`, converting any failure into an [`HttpError`] of `kind`.
///
/// The partial `response`, when given, is attached to the error.
pub async fn with_http_error<T, E, F>(
    kind: ErrorKind,
    request: &Request,
    response: Option<&Response>,
    operation: F,
) -> HttpResult<T>
where
    F: Future<Output = Result<T, E>>,
    E: Into<BoxError>,
{
    operation.await.map_err(|err| {
        let error = HttpError::new(kind, request.clone()).with_source(err);
        match response {
            Some(response) => error.with_response(response.clone()),
            None => error,
        }
    })
}
