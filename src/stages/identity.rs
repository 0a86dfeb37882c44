use async_trait::async_trait;

use crate::chain::{Handler, Next};
use crate::http::{HttpResult, Request, Response};

/// Forwards every request untouched. Useful as a placeholder stage.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityStage;

#[async_trait]
impl Handler for IdentityStage {
    async fn handle(&self, request: Request, next: Next<'_>) -> HttpResult<Response> {
        next.run(request).await
    }
}
