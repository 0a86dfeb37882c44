//! Request logging and metrics.

use std::time::Instant;

use async_trait::async_trait;

use crate::chain::{Handler, Next};
use crate::http::{HttpResult, Request, Response};
use crate::observability::metrics;

/// Logs each request's start, completion and failure.
///
/// Errors are re-raised exactly as received.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingStage;

impl LoggingStage {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Handler for LoggingStage {
    async fn handle(&self, request: Request, next: Next<'_>) -> HttpResult<Response> {
        let start = Instant::now();
        let request_id = request.id();
        let method = request.method().clone();
        let url = display_url(&request);

        tracing::info!(%request_id, %method, %url, "Request started");

        let result = next.run(request).await;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match &result {
            Ok(response) => {
                tracing::info!(
                    %request_id,
                    url = %display_url(response.request()),
                    status = response.status().as_u16(),
                    elapsed_ms,
                    "Request completed"
                );
                metrics::record_request(method.as_str(), "ok", start);
            }
            Err(err) => {
                tracing::error!(%request_id, error = %err, elapsed_ms, "Request failed");
                metrics::record_request(method.as_str(), err.kind().label(), start);
            }
        }

        result
    }
}

fn display_url(request: &Request) -> String {
    request
        .url()
        .map(|url| url.to_string())
        .unwrap_or_else(|| "<invalid url>".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    use crate::chain::Chain;
    use crate::concurrency::Cancellation;
    use crate::http::ErrorKind;

    struct Echo;

    #[async_trait]
    impl Handler for Echo {
        async fn handle(&self, request: Request, _next: Next<'_>) -> HttpResult<Response> {
            Ok(Response::new(request, 202u16))
        }
    }

    #[tokio::test]
    async fn test_passes_response_through() {
        let chain = Chain::start_with(LoggingStage::new()).append(Echo).unwrap();
        let request = Request::get("/logged").with_host("example.com");
        let id = request.id();

        let response = chain.handle(request, &Cancellation::new()).await.unwrap();
        assert_eq!(response.status().as_u16(), 202);
        assert_eq!(response.request().id(), id);
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Points the request at a different host before answering.
    struct Redirecting;

    #[async_trait]
    impl Handler for Redirecting {
        async fn handle(&self, mut request: Request, _next: Next<'_>) -> HttpResult<Response> {
            request.set_host(Some("resolved.example.com".to_string()));
            Ok(Response::new(request, 200u16))
        }
    }

    #[tokio::test]
    async fn test_completion_logs_url_as_sent() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let chain = Chain::start_with(LoggingStage::new())
            .append(Redirecting)
            .unwrap();
        chain
            .handle(Request::get("/logged"), &Cancellation::new())
            .await
            .unwrap();

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        let completed = output
            .lines()
            .find(|line| line.contains("Request completed"))
            .unwrap();
        assert!(
            completed.contains("url=https://resolved.example.com/logged"),
            "{completed}"
        );
    }

    #[tokio::test]
    async fn test_reraises_error_unchanged() {
        let chain = Chain::start_with(LoggingStage::new());
        let request = Request::get("relative");
        let id = request.id();

        let err = chain.handle(request, &Cancellation::new()).await.unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidConfiguration { .. }));
        assert_eq!(err.request().id(), id);
    }
}
