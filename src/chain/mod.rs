//! Handler chain: stage contract, assembly and the client entry point.
//!
//! # Data Flow
//! ```text
//! HttpClient::send(request)
//!     → Chain::handle (head stage)
//!     → stage.handle(request, next)
//!         → next.run(adjusted copy) → successor ... → terminal stage
//!     ← Response or HttpError flows back through every stage in reverse
//! ```
//!
//! # Design Decisions
//! - Stages are trait objects behind `Arc`, so one stage value can be shared
//!   by several chains and clients
//! - `Next` is a borrowed view of the chain, not an owned successor, so a
//!   stage cannot retain or re-link its successor
//! - Each `Next::run` allocates one boxed future; nesting depth equals the
//!   number of stages

pub mod assembly;
pub mod builder;
pub mod client;
pub mod handler;

pub use assembly::{Chain, ChainError};
pub use builder::ChainBuilder;
pub use client::HttpClient;
pub use handler::{Handler, HandlerFuture, Next};
