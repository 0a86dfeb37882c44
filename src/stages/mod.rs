//! Built-in pipeline stages.
//!
//! # Data Flow
//! ```text
//! LoggingStage             (logging.rs)      logs and re-raises
//!     → StatusValidatingStage (status.rs)    checks the status on the way back
//!     → EnvironmentStage   (environment.rs)  fills host, prefix, headers
//!     → ThrottleStage      (throttle.rs)     holds a permit around the rest
//!     → TransportStage     (transport.rs)    terminal: performs the exchange
//! ```
//!
//! Any order is allowed; this is the order `HttpClient::from_config` uses.

pub mod environment;
pub mod identity;
pub mod logging;
pub mod status;
pub mod throttle;
pub mod transport;

pub use environment::EnvironmentStage;
pub use identity::IdentityStage;
pub use logging::LoggingStage;
pub use status::StatusValidatingStage;
pub use throttle::ThrottleStage;
pub use transport::TransportStage;
