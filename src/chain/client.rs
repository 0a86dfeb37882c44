//! Caller-facing entry point to a chain.

use std::sync::Arc;

use crate::chain::{Chain, ChainBuilder, ChainError, Handler};
use crate::concurrency::Cancellation;
use crate::config::{validate_config, ConfigError, PipelineConfig, ValidationError};
use crate::http::{HttpResult, Request, Response};
use crate::stages::{
    EnvironmentStage, LoggingStage, StatusValidatingStage, ThrottleStage, TransportStage,
};
use crate::transport::Transport;

/// Sends requests through a shared chain.
///
/// Cloning is cheap; clones share the same stages, including any throttle.
#[derive(Debug, Clone)]
pub struct HttpClient {
    chain: Arc<Chain>,
}

impl HttpClient {
    pub fn new(chain: Chain) -> Self {
        Self {
            chain: Arc::new(chain),
        }
    }

    /// A client whose chain holds just `handler`.
    pub fn start_with(handler: impl Handler) -> Self {
        Self::new(Chain::start_with(handler))
    }

    /// A client with `handler` appended to this client's chain.
    pub fn then(self, handler: impl Handler) -> Result<Self, ChainError> {
        let chain = Chain::clone(&self.chain).append(handler)?;
        Ok(Self::new(chain))
    }

    /// Assemble the standard chain from configuration:
    /// logging → status validation → environment → throttle → transport.
    ///
    /// Disabled sections are left out.
    pub fn from_config(
        config: &PipelineConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, ConfigError> {
        validate_config(config).map_err(ConfigError::Validation)?;

        let mut builder = ChainBuilder::new()
            .stage_if(config.observability.log_requests, LoggingStage::new)
            .stage_if(config.status.enabled, || {
                StatusValidatingStage::new(config.status.accepted_start..config.status.accepted_end)
            });

        if let Some(environment) = &config.environment {
            let environment = environment
                .to_environment()
                .map_err(|err| ConfigError::Validation(vec![err]))?;
            builder = builder.stage(EnvironmentStage::new(environment));
        }

        if config.throttle.enabled {
            let throttle = ThrottleStage::try_new(config.throttle.max_in_flight)
                .ok_or_else(|| ConfigError::Validation(vec![ValidationError::ZeroThrottle]))?;
            builder = builder.stage(throttle);
        }

        let chain = builder.stage(TransportStage::new(transport)).build()?;
        tracing::debug!(stages = ?chain.stage_names(), "Assembled pipeline");
        Ok(Self::new(chain))
    }

    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    /// Send `request` with a fresh, never-cancelled signal.
    pub async fn send(&self, request: Request) -> HttpResult<Response> {
        self.chain.handle(request, &Cancellation::new()).await
    }

    /// Send `request`, giving up as soon as `cancellation` fires.
    pub async fn send_with_cancellation(
        &self,
        request: Request,
        cancellation: &Cancellation,
    ) -> HttpResult<Response> {
        self.chain.handle(request, cancellation).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::chain::Next;
    use crate::stages::IdentityStage;

    struct Teapot;

    #[async_trait]
    impl Handler for Teapot {
        async fn handle(&self, request: Request, _next: Next<'_>) -> HttpResult<Response> {
            Ok(Response::new(request, 418u16))
        }
    }

    #[tokio::test]
    async fn test_then_appends_without_touching_original() {
        let base = HttpClient::start_with(IdentityStage);
        let full = base.clone().then(Teapot).unwrap();

        assert_eq!(base.chain().stage_count(), 1);
        assert_eq!(full.chain().stage_names(), vec!["IdentityStage", "Teapot"]);

        let response = full.send(Request::get("/brew")).await.unwrap();
        assert_eq!(response.status().as_u16(), 418);

        let err = base.send(Request::get("/brew")).await.unwrap_err();
        assert!(matches!(
            err.kind(),
            crate::http::ErrorKind::InvalidConfiguration { .. }
        ));
    }
}
