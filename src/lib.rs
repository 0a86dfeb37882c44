//! Composable outbound HTTP request pipeline.
//!
//! # Architecture Overview
//!
//! ```text
//!     Request                                                   Transport
//!     ───────▶ ┌─────────┐   ┌────────┐   ┌─────────────┐   ┌──────────┐   ┌───────────┐ ───────▶
//!              │ logging │──▶│ status │──▶│ environment │──▶│ throttle │──▶│ transport │
//!     ◀─────── └─────────┘◀──└────────┘◀──└─────────────┘◀──└──────────┘◀──└───────────┘ ◀───────
//!     Response / HttpError
//! ```
//!
//! Every stage implements [`Handler`]. A [`Chain`] links stages in order and
//! dispatches a request from its head; each stage may short-circuit or forward
//! to its successor and observe the outcome on the way back.

// Value types
pub mod http;
pub mod options;

// Pipeline engine
pub mod chain;
pub mod concurrency;
pub mod stages;
pub mod transport;

// Cross-cutting concerns
pub mod config;
pub mod observability;

pub use chain::{Chain, ChainBuilder, ChainError, Handler, HttpClient, Next};
pub use concurrency::{Cancellation, TokenBucket};
pub use config::PipelineConfig;
pub use crate::http::{ErrorKind, HttpError, HttpResult, Request, RequestId, Response, Status};
pub use options::{RequestOption, ServerEnvironment};
pub use stages::{
    EnvironmentStage, IdentityStage, LoggingStage, StatusValidatingStage, ThrottleStage,
    TransportStage,
};
pub use transport::{ReqwestTransport, Transport};
