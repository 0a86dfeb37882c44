//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use http_pipeline::concurrency::Cancellation;
use http_pipeline::transport::{
    Transport, TransportError, TransportErrorCode, TransportRequest, TransportResponse,
};
use http_pipeline::{Handler, HttpResult, Next, Request, Response};

/// What a [`MockTransport`] answers with.
#[derive(Debug, Clone)]
pub enum Reply {
    Status(u16, Option<&'static str>),
    Fail(TransportErrorCode),
    Garbage,
}

/// In-memory transport that records calls and tracks peak concurrency.
#[derive(Debug)]
pub struct MockTransport {
    reply: Reply,
    delay: Duration,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    requests: Mutex<Vec<TransportRequest>>,
}

impl MockTransport {
    pub fn new(reply: Reply) -> Arc<Self> {
        Self::with_delay(reply, Duration::ZERO)
    }

    pub fn with_delay(reply: Reply, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            reply,
            delay,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn ok() -> Arc<Self> {
        Self::new(Reply::Status(200, None))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<TransportRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(
        &self,
        request: TransportRequest,
        _cancellation: &Cancellation,
    ) -> Result<TransportResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request);

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(current, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match &self.reply {
            Reply::Status(status, body) => {
                let response = TransportResponse::new(*status);
                Ok(match body {
                    Some(body) => response.with_body(*body),
                    None => response,
                })
            }
            Reply::Fail(code) => Err(TransportError::failed(*code, "mock failure")),
            Reply::Garbage => Err(TransportError::InvalidResponse("not http".into())),
        }
    }
}

/// Stage that appends `enter`/`leave` markers to a shared log.
pub struct RecordingStage {
    pub label: &'static str,
    pub log: Arc<Mutex<Vec<String>>>,
}

impl RecordingStage {
    pub fn new(label: &'static str, log: &Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            label,
            log: log.clone(),
        }
    }
}

#[async_trait]
impl Handler for RecordingStage {
    async fn handle(&self, request: Request, next: Next<'_>) -> HttpResult<Response> {
        self.log.lock().unwrap().push(format!("enter {}", self.label));
        let result = next.run(request).await;
        self.log.lock().unwrap().push(format!("leave {}", self.label));
        result
    }

    fn name(&self) -> &'static str {
        self.label
    }
}

/// Start a mock backend on an ephemeral port that answers every connection
/// with `status` and `body`.
pub async fn start_mock_backend(status: &'static str, body: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}
