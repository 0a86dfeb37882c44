//! Status code validation.

use std::ops::Range;

use async_trait::async_trait;

use crate::chain::{Handler, Next};
use crate::http::{ErrorKind, HttpError, HttpResult, Request, Response};

/// Fails responses whose status lies outside an accepted range.
#[derive(Debug, Clone)]
pub struct StatusValidatingStage {
    accepted: Range<u16>,
}

impl StatusValidatingStage {
    /// Accept statuses in the half-open range `accepted`.
    pub fn new(accepted: Range<u16>) -> Self {
        Self { accepted }
    }

    pub fn accepted(&self) -> &Range<u16> {
        &self.accepted
    }
}

/// Accepts `200..300`.
impl Default for StatusValidatingStage {
    fn default() -> Self {
        Self::new(200..300)
    }
}

#[async_trait]
impl Handler for StatusValidatingStage {
    async fn handle(&self, request: Request, next: Next<'_>) -> HttpResult<Response> {
        let response = next.run(request).await?;
        let status = response.status();

        if self.accepted.contains(&status.as_u16()) {
            return Ok(response);
        }

        tracing::debug!(
            request_id = %response.request().id(),
            status = status.as_u16(),
            "Rejecting response status"
        );
        Err(HttpError::new(ErrorKind::InvalidStatus(status), response.request().clone())
            .with_response(response))
    }
}
