//! HTTP value types carried through the pipeline.
//!
//! # Data Flow
//! ```text
//! caller builds Request
//!     → stages clone, adjust and forward it (request.rs)
//!     → terminal stage encodes the body (body.rs)
//!     → Response wraps the request exactly as sent (response.rs)
//!     → or HttpError carries request, partial response and cause (error.rs)
//! ```
//!
//! # Design Decisions
//! - All types are plain values; no stage sees another stage's mutation
//! - Methods and header maps come from the `http` crate, so custom verbs work
//! - Status is a bare wrapper over `u16`; nonstandard codes survive untouched

pub mod body;
pub mod error;
pub mod request;
pub mod response;

pub use body::{Body, DataBody, EmptyBody, EncodingError, FormBody, JsonBody};
pub use error::{with_http_error, BoxError, ErrorKind, HttpError, HttpResult, ResultExt};
pub use request::{Request, RequestId};
pub use response::{Response, Status};
