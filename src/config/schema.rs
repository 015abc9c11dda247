//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the server.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::observability::sampler::SampleScope;

/// Root configuration for the storefront server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration (bind address, body limits).
    pub listener: ListenerConfig,

    /// Log sink configuration (file + console destinations).
    pub logging: LoggingConfig,

    /// Resource sampler settings.
    pub sampler: SamplerConfig,

    /// Rate limiting for the add-to-cart route.
    pub rate_limit: RateLimitConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8000").
    pub bind_address: String,

    /// Maximum accepted request body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
            max_body_bytes: 1024 * 1024,
        }
    }
}

/// Log sink configuration.
///
/// Two destinations are configured at startup: an append-only file capturing
/// everything down to `file_level`, and a console (stderr) stream capturing
/// `console_level` and above. The console threshold can be overridden at
/// runtime via `RUST_LOG`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Directory for log files, created at startup if missing.
    pub dir: String,

    /// Log file name within `dir`.
    pub file: String,

    /// Minimum severity written to the file sink.
    pub file_level: String,

    /// Minimum severity written to the console sink.
    pub console_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: "logs".to_string(),
            file: "server.log".to_string(),
            file_level: "trace".to_string(),
            console_level: "debug".to_string(),
        }
    }
}

/// Resource sampler configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Enable the background sampler.
    pub enabled: bool,

    /// Seconds between samples.
    pub interval_secs: u64,

    /// Host-level (aggregate machine) or process-level counters.
    pub scope: SampleScope,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: 60,
            scope: SampleScope::Host,
        }
    }
}

/// Rate limiting configuration (token bucket, keyed by client IP).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Enable rate limiting on the add-to-cart route.
    pub enabled: bool,

    /// Sustained requests per minute per client.
    pub per_minute: u32,

    /// Bucket capacity (maximum burst).
    pub burst: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            per_minute: 5,
            burst: 5,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_deployment_constants() {
        let config = ServerConfig::default();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8000");
        assert_eq!(config.sampler.interval_secs, 60);
        assert_eq!(config.sampler.scope, SampleScope::Host);
        assert_eq!(config.rate_limit.per_minute, 5);
        assert_eq!(config.logging.file_level, "trace");
        assert_eq!(config.logging.console_level, "debug");
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: ServerConfig = toml::from_str(
            r#"
            [sampler]
            interval_secs = 30
            scope = "process"
            "#,
        )
        .unwrap();
        assert_eq!(config.sampler.interval_secs, 30);
        assert_eq!(config.sampler.scope, SampleScope::Process);
        assert_eq!(config.listener.bind_address, "0.0.0.0:8000");
    }
}
