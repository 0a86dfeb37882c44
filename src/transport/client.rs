//! Transport backed by `reqwest`.

use std::error::Error as StdError;

use async_trait::async_trait;
use reqwest::Client;

use crate::concurrency::Cancellation;
use crate::transport::{
    Transport, TransportError, TransportErrorCode, TransportRequest, TransportResponse,
};

/// Sends requests with a shared `reqwest::Client` connection pool.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    async fn exchange(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        // Anything else could never yield an HTTP response.
        if !matches!(request.url.scheme(), "http" | "https") {
            return Err(TransportError::InvalidResponse(
                format!("unsupported scheme {:?}", request.url.scheme()).into(),
            ));
        }

        let mut builder = self
            .client
            .request(request.method, request.url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(classify)?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(classify)?;

        Ok(TransportResponse {
            status: status.into(),
            headers,
            body: (!body.is_empty()).then_some(body),
        })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(
        &self,
        request: TransportRequest,
        cancellation: &Cancellation,
    ) -> Result<TransportResponse, TransportError> {
        tokio::select! {
            biased;
            _ = cancellation.cancelled() => Err(TransportError::Cancelled),
            result = self.exchange(request) => result,
        }
    }
}

fn classify(err: reqwest::Error) -> TransportError {
    if is_parse_error(&err) {
        return TransportError::InvalidResponse(err.into());
    }

    let code = if err.is_timeout() {
        TransportErrorCode::Timeout
    } else if err.is_connect() {
        TransportErrorCode::Connect
    } else if err.is_redirect() {
        TransportErrorCode::Redirect
    } else if err.is_decode() {
        TransportErrorCode::Decode
    } else if err.is_body() {
        TransportErrorCode::Body
    } else if err.is_request() {
        TransportErrorCode::Request
    } else {
        return TransportError::Other(err.into());
    };
    TransportError::failed(code, err)
}

/// Whether the peer answered with something that is not HTTP.
fn is_parse_error(err: &reqwest::Error) -> bool {
    let mut source = err.source();
    while let Some(cause) = source {
        if let Some(hyper_err) = cause.downcast_ref::<hyper::Error>() {
            return hyper_err.is_parse() || hyper_err.is_parse_status();
        }
        source = cause.source();
    }
    false
}
