//! Concurrency throttle.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;

use crate::chain::{Handler, Next};
use crate::concurrency::{AcquireError, TokenBucket};
use crate::http::{ErrorKind, HttpError, HttpResult, Request, Response};
use crate::observability::metrics;

/// Caps how many requests are in flight past this stage at once.
///
/// Callers over the cap wait in arrival order with no queue limit and no
/// timeout; cancel the request to stop waiting.
#[derive(Debug)]
pub struct ThrottleStage {
    bucket: Arc<TokenBucket>,
}

impl ThrottleStage {
    /// # Panics
    /// Panics if `max_in_flight` is zero.
    pub fn new(max_in_flight: usize) -> Self {
        assert!(max_in_flight > 0, "throttle limit must be positive");
        Self {
            bucket: Arc::new(TokenBucket::new(max_in_flight)),
        }
    }

    /// Like [`ThrottleStage::new`], returning `None` for a zero limit.
    pub fn try_new(max_in_flight: usize) -> Option<Self> {
        (max_in_flight > 0).then(|| Self::new(max_in_flight))
    }

    pub fn max_in_flight(&self) -> usize {
        self.bucket.capacity()
    }

    pub fn available(&self) -> usize {
        self.bucket.available()
    }

    pub fn waiting(&self) -> usize {
        self.bucket.waiting()
    }
}

#[async_trait]
impl Handler for ThrottleStage {
    async fn handle(&self, request: Request, next: Next<'_>) -> HttpResult<Response> {
        let started = Instant::now();
        let _permit = match self.bucket.acquire(next.cancellation()).await {
            Ok(permit) => permit,
            Err(AcquireError::Cancelled) => {
                tracing::debug!(request_id = %request.id(), "Cancelled while throttled");
                return Err(HttpError::new(ErrorKind::Cancelled, request));
            }
        };
        metrics::record_throttle_wait(started.elapsed());

        next.run(request).await
    }
}
