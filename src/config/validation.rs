//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (status range non-empty, throttle > 0)
//! - Check header names and values parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: PipelineConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use http::header::{HeaderName, HeaderValue};
use thiserror::Error;
use tracing_subscriber::filter::LevelFilter;

use crate::config::schema::PipelineConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("environment host must not be empty")]
    EmptyHost,

    #[error("invalid header name: {0}")]
    InvalidHeaderName(String),

    #[error("invalid value for header {0}")]
    InvalidHeaderValue(String),

    #[error("accepted status range {start}..{end} is empty")]
    EmptyStatusRange { start: u16, end: u16 },

    #[error("throttle max_in_flight must be positive")]
    ZeroThrottle,

    #[error("unknown log level: {0}")]
    InvalidLogLevel(String),
}

pub fn validate_config(config: &PipelineConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Some(environment) = &config.environment {
        if environment.host.trim().is_empty() {
            errors.push(ValidationError::EmptyHost);
        }
        for (name, value) in &environment.headers {
            if HeaderName::from_bytes(name.as_bytes()).is_err() {
                errors.push(ValidationError::InvalidHeaderName(name.clone()));
            } else if HeaderValue::from_str(value).is_err() {
                errors.push(ValidationError::InvalidHeaderValue(name.clone()));
            }
        }
    }

    if config.status.enabled && config.status.accepted_start >= config.status.accepted_end {
        errors.push(ValidationError::EmptyStatusRange {
            start: config.status.accepted_start,
            end: config.status.accepted_end,
        });
    }

    if config.throttle.enabled && config.throttle.max_in_flight == 0 {
        errors.push(ValidationError::ZeroThrottle);
    }

    if config.observability.log_level.parse::<LevelFilter>().is_err() {
        errors.push(ValidationError::InvalidLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::EnvironmentConfig;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&PipelineConfig::default()).is_ok());
    }

    #[test]
    fn test_environment_checks() {
        let mut config = PipelineConfig::default();
        let mut environment = EnvironmentConfig::default();
        environment.headers.insert("bad header".to_string(), "x".to_string());
        environment.headers.insert("X-Ok".to_string(), "line\nbreak".to_string());
        config.environment = Some(environment);

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::EmptyHost,
                // Headers are checked in name order; uppercase sorts first.
                ValidationError::InvalidHeaderValue("X-Ok".to_string()),
                ValidationError::InvalidHeaderName("bad header".to_string()),
            ]
        );
    }

    #[test]
    fn test_disabled_sections_are_not_checked() {
        let mut config = PipelineConfig::default();
        config.status.enabled = false;
        config.status.accepted_start = 500;
        config.status.accepted_end = 100;
        config.throttle.max_in_flight = 0;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_log_level() {
        let mut config = PipelineConfig::default();
        config.observability.log_level = "chatty".to_string();
        assert_eq!(
            validate_config(&config).unwrap_err(),
            vec![ValidationError::InvalidLogLevel("chatty".to_string())]
        );
    }
}
