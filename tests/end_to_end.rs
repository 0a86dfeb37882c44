//! Pipeline over the reqwest transport against a local mock backend.

use std::sync::Arc;

use http_pipeline::config::PipelineConfig;
use http_pipeline::transport::TransportErrorCode;
use http_pipeline::{ErrorKind, HttpClient, ReqwestTransport, Request, Status};

mod common;

fn local_request(addr: std::net::SocketAddr, path: &str) -> Request {
    Request::get(path)
        .with_scheme("http")
        .with_host(addr.ip().to_string())
        .with_port(addr.port())
}

#[tokio::test]
async fn test_round_trip_through_default_chain() {
    let addr = common::start_mock_backend("200 OK", "Hello from backend").await;
    let client =
        HttpClient::from_config(&PipelineConfig::default(), Arc::new(ReqwestTransport::default()))
            .unwrap();

    let response = client.send(local_request(addr, "/hello")).await.unwrap();
    assert_eq!(response.status(), Status::OK);
    assert_eq!(
        response.body().map(|b| b.as_ref()),
        Some(&b"Hello from backend"[..])
    );
}

#[tokio::test]
async fn test_backend_error_status_is_rejected() {
    let addr = common::start_mock_backend("503 Service Unavailable", "down").await;
    let client =
        HttpClient::from_config(&PipelineConfig::default(), Arc::new(ReqwestTransport::default()))
            .unwrap();

    let err = client.send(local_request(addr, "/")).await.unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::InvalidStatus(Status(503)));
}

#[tokio::test]
async fn test_unreachable_backend_is_connect_error() {
    let addr = {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let client =
        HttpClient::from_config(&PipelineConfig::default(), Arc::new(ReqwestTransport::default()))
            .unwrap();

    let err = client.send(local_request(addr, "/")).await.unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::Transport(TransportErrorCode::Connect));
    assert!(err.underlying().is_some());
}
