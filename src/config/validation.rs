//! Configuration validation.
//!
//! Semantic checks on an already-deserialized config. Returns all errors,
//! not just the first, so a broken config can be fixed in one pass.

use thiserror::Error;
use tracing_subscriber::filter::LevelFilter;

use crate::config::schema::ServerConfig;

/// A single semantic validation failure.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("invalid bind address {0:?}")]
    InvalidBindAddress(String),

    #[error("invalid log level {value:?} for {field}")]
    InvalidLogLevel { field: &'static str, value: String },

    #[error("sampler interval must be greater than zero")]
    ZeroSamplerInterval,

    #[error("rate limit per_minute must be greater than zero when enabled")]
    ZeroRateLimit,

    #[error("rate limit burst must be greater than zero when enabled")]
    ZeroBurst,

    #[error("max_body_bytes must be greater than zero")]
    ZeroBodyLimit,

    #[error("request timeout must be greater than zero")]
    ZeroRequestTimeout,
}

/// Validate a configuration, collecting every semantic error.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<std::net::SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }
    if config.listener.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    for (field, value) in [
        ("logging.file_level", &config.logging.file_level),
        ("logging.console_level", &config.logging.console_level),
    ] {
        if value.parse::<LevelFilter>().is_err() {
            errors.push(ValidationError::InvalidLogLevel {
                field,
                value: value.clone(),
            });
        }
    }

    if config.sampler.enabled && config.sampler.interval_secs == 0 {
        errors.push(ValidationError::ZeroSamplerInterval);
    }

    if config.rate_limit.enabled {
        if config.rate_limit.per_minute == 0 {
            errors.push(ValidationError::ZeroRateLimit);
        }
        if config.rate_limit.burst == 0 {
            errors.push(ValidationError::ZeroBurst);
        }
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
