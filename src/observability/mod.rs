//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! LoggingStage / ThrottleStage / transport
//!     → logging.rs (tracing subscriber installed by the binary)
//!     → metrics.rs (counters and histograms via the `metrics` facade)
//! ```
//!
//! # Design Decisions
//! - The library only emits events; installing a subscriber or a metrics
//!   recorder is left to the application
//! - Request ID is attached to every per-request event
//! - Metric updates without a recorder are no-ops

pub mod logging;
pub mod metrics;
