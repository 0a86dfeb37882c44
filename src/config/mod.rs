//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (read & deserialize)
//!     → validation.rs (semantic checks)
//!     → PipelineConfig (validated, immutable)
//!     → HttpClient::from_config assembles the chain
//! ```
//!
//! # Design Decisions
//! - All fields have defaults so an empty file is a valid config
//! - Validation separates syntactic (serde) from semantic checks
//! - Header maps are kept as strings until the chain is assembled

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    EnvironmentConfig, ObservabilityConfig, PipelineConfig, StatusConfig, ThrottleConfig,
};
pub use validation::{validate_config, ValidationError};
