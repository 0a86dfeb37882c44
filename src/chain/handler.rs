//! The stage contract and the continuation passed to each stage.

use std::future::Future;
use std::pin::Pin;

use async_trait::async_trait;

use crate::chain::Chain;
use crate::concurrency::Cancellation;
use crate::http::{HttpError, HttpResult, Request, Response};

/// Boxed future returned when a stage delegates to its successor.
pub type HandlerFuture<'a> = Pin<Box<dyn Future<Output = HttpResult<Response>> + Send + 'a>>;

/// One stage of the pipeline.
///
/// A stage either answers the request itself or calls [`Next::run`] with a
/// (possibly adjusted) copy and inspects what comes back.
#[async_trait]
pub trait Handler: Send + Sync + 'static {
    async fn handle(&self, request: Request, next: Next<'_>) -> HttpResult<Response>;

    /// Display name used in traversal listings and logs.
    fn name(&self) -> &'static str {
        short_type_name::<Self>()
    }
}

fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// The rest of the chain as seen from one stage.
#[derive(Clone, Copy)]
pub struct Next<'a> {
    chain: &'a Chain,
    successor: Option<usize>,
    cancellation: &'a Cancellation,
}

impl<'a> Next<'a> {
    pub(crate) fn new(
        chain: &'a Chain,
        successor: Option<usize>,
        cancellation: &'a Cancellation,
    ) -> Self {
        Self {
            chain,
            successor,
            cancellation,
        }
    }

    /// Forward `request` to the successor.
    ///
    /// Fails with `InvalidConfiguration("Missing handler")` when this stage
    /// is the last one in the chain.
    pub fn run(self, request: Request) -> HandlerFuture<'a> {
        match self.successor {
            Some(index) => self.chain.dispatch(index, request, self.cancellation),
            None => Box::pin(async move { Err(HttpError::missing_handler(request)) }),
        }
    }

    /// The caller's cancellation signal for this request.
    pub fn cancellation(&self) -> &'a Cancellation {
        self.cancellation
    }

    /// Whether a successor exists.
    pub fn is_linked(&self) -> bool {
        self.successor.is_some()
    }
}

impl std::fmt::Debug for Next<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Next")
            .field("successor", &self.successor)
            .field("cancelled", &self.cancellation.is_cancelled())
            .finish()
    }
}
