//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use std::collections::BTreeMap;

use http::header::{HeaderName, HeaderValue};
use http::HeaderMap;
use serde::{Deserialize, Serialize};

use crate::config::validation::ValidationError;
use crate::options::ServerEnvironment;

/// Root configuration for a pipeline.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct PipelineConfig {
    /// Default server environment. No environment stage when absent.
    pub environment: Option<EnvironmentConfig>,

    /// Status validation settings.
    pub status: StatusConfig,

    /// Concurrency throttle settings.
    pub throttle: ThrottleConfig,

    /// Logging settings.
    pub observability: ObservabilityConfig,
}

/// Default host, path prefix and headers.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    pub host: String,

    /// Prefix for relative paths. A leading `/` is added when missing.
    pub path_prefix: String,

    /// Headers added when the request does not set them.
    pub headers: BTreeMap<String, String>,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            path_prefix: "/".to_string(),
            headers: BTreeMap::new(),
        }
    }
}

impl EnvironmentConfig {
    /// Parse the header table into a [`ServerEnvironment`].
    pub fn to_environment(&self) -> Result<ServerEnvironment, ValidationError> {
        Ok(ServerEnvironment::new(self.host.clone())
            .with_path_prefix(self.path_prefix.clone())
            .with_headers(self.header_map()?))
    }

    pub(crate) fn header_map(&self) -> Result<HeaderMap, ValidationError> {
        let mut headers = HeaderMap::new();
        for (name, value) in &self.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| ValidationError::InvalidHeaderName(name.clone()))?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|_| ValidationError::InvalidHeaderValue(name.clone()))?;
            headers.insert(header_name, header_value);
        }
        Ok(headers)
    }
}

/// Accepted status range.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StatusConfig {
    pub enabled: bool,

    /// First accepted status (inclusive).
    pub accepted_start: u16,

    /// End of the accepted range (exclusive).
    pub accepted_end: u16,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            accepted_start: 200,
            accepted_end: 300,
        }
    }
}

/// Concurrency throttle.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ThrottleConfig {
    pub enabled: bool,

    /// Maximum requests in flight past the throttle.
    pub max_in_flight: usize,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_in_flight: 16,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level for this crate when `RUST_LOG` is unset.
    pub log_level: String,

    /// Add a logging stage at the head of the chain.
    pub log_requests: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_requests: true,
        }
    }
}
