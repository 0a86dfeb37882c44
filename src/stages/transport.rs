//! Terminal stage performing the network exchange.
//!
//! # Responsibilities
//! - Refuse work once the request is cancelled
//! - Resolve the URL, merge body headers and encode the body
//! - Hand the exchange to a [`Transport`] and classify what comes back
//!
//! # Design Decisions
//! - Never delegates; any successor is ignored
//! - Body headers override request headers of the same name
//! - The returned response holds the request exactly as it went out

use std::sync::Arc;

use async_trait::async_trait;

use crate::chain::{Handler, Next};
use crate::http::{ErrorKind, HttpError, HttpResult, Request, Response, ResultExt};
use crate::transport::{Transport, TransportError, TransportRequest};

/// Sends the request through a [`Transport`].
#[derive(Clone)]
pub struct TransportStage {
    transport: Arc<dyn Transport>,
}

impl TransportStage {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }
}

impl std::fmt::Debug for TransportStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportStage").finish_non_exhaustive()
    }
}

#[async_trait]
impl Handler for TransportStage {
    async fn handle(&self, mut request: Request, next: Next<'_>) -> HttpResult<Response> {
        let cancellation = next.cancellation();
        if cancellation.is_cancelled() {
            return Err(HttpError::new(ErrorKind::Cancelled, request));
        }

        let Some(url) = request.url() else {
            tracing::debug!(
                request_id = %request.id(),
                host = ?request.host(),
                path = request.path(),
                "Request has no resolvable URL"
            );
            return Err(HttpError::new(ErrorKind::InvalidRequest, request));
        };

        let body = if request.body().is_empty() {
            None
        } else {
            let extra = request.body().additional_headers();
            request.headers_mut().extend(extra);
            let bytes = request
                .body()
                .encode(&request)
                .or_http_error(ErrorKind::InvalidRequest, &request)?;
            Some(bytes)
        };

        let outgoing = TransportRequest {
            method: request.method().clone(),
            url,
            headers: request.headers().clone(),
            body,
        };

        let outcome = tokio::select! {
            biased;
            _ = cancellation.cancelled() => Err(TransportError::Cancelled),
            result = self.transport.execute(outgoing, cancellation) => result,
        };

        match outcome {
            Ok(reply) => Ok(Response::new(request, reply.status)
                .with_headers(reply.headers)
                .with_body(reply.body)),
            Err(err) => Err(err.into_http_error(request)),
        }
    }
}
