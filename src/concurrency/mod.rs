//! Concurrency primitives used by the pipeline.
//!
//! # Data Flow
//! ```text
//! caller creates Cancellation
//!     → passed down the chain alongside each request
//!     → throttle stage races it against permit acquisition (token_bucket.rs)
//!     → terminal stage checks it before and during the transport exchange
//! ```
//!
//! # Design Decisions
//! - The token bucket is the only shared mutable state in the pipeline
//! - All bucket state transitions happen under one mutex
//! - Cancellation is cooperative: nothing is aborted, waiters just stop waiting

pub mod cancellation;
pub mod token_bucket;

pub use cancellation::Cancellation;
pub use token_bucket::{AcquireError, Permit, TokenBucket};
