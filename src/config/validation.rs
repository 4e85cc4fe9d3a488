//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate URL shapes and route paths
//! - Validate timer value ranges (timeout > 0, warning within timeout)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ToolkitConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;
use url::Url;

use crate::config::schema::{ToolkitConfig, MAX_TIMEOUT_MINUTES};

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("api.base_url '{0}' is not an http(s) URL")]
    InvalidBaseUrl(String),

    #[error("{field} '{value}' must start with '/'")]
    RelativePath { field: &'static str, value: String },

    #[error("api.special_routes contains an empty route name")]
    EmptyRouteName,

    #[error("session_timer.timeout_minutes must be positive, got {0}")]
    NonPositiveTimeout(f64),

    #[error("session_timer.timeout_minutes must not exceed {max}, got {0}", max = MAX_TIMEOUT_MINUTES)]
    TimeoutTooLarge(f64),

    #[error("session_timer.warning_minutes {warning} must be within 0..={timeout}")]
    WarningOutOfRange { warning: f64, timeout: f64 },

    #[error("session_timer.tick_interval_ms must be positive")]
    ZeroTickInterval,

    #[error("session_timer.tick_interval_ms {tick_ms} exceeds the {timeout_ms} ms timeout")]
    TickIntervalTooLarge { tick_ms: u64, timeout_ms: f64 },

    #[error("storage.namespace must not be empty")]
    EmptyNamespace,
}

/// Check a configuration, collecting every error found.
pub fn validate_config(config: &ToolkitConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let api = &config.api;

    match Url::parse(&api.base_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        _ => errors.push(ValidationError::InvalidBaseUrl(api.base_url.clone())),
    }

    if !api.api_path.is_empty() && !api.api_path.starts_with('/') {
        errors.push(ValidationError::RelativePath {
            field: "api.api_path",
            value: api.api_path.clone(),
        });
    }

    if !api.version_prefix.starts_with('/') {
        errors.push(ValidationError::RelativePath {
            field: "api.version_prefix",
            value: api.version_prefix.clone(),
        });
    }

    for (name, path) in &api.special_routes {
        if name.is_empty() {
            errors.push(ValidationError::EmptyRouteName);
        }
        if !path.starts_with('/') {
            errors.push(ValidationError::RelativePath {
                field: "api.special_routes",
                value: path.clone(),
            });
        }
    }

    let timer = &config.session_timer;
    if !(timer.timeout_minutes.is_finite() && timer.timeout_minutes > 0.0) {
        errors.push(ValidationError::NonPositiveTimeout(timer.timeout_minutes));
    } else if timer.timeout_minutes > MAX_TIMEOUT_MINUTES {
        errors.push(ValidationError::TimeoutTooLarge(timer.timeout_minutes));
    } else if !(timer.warning_minutes >= 0.0 && timer.warning_minutes <= timer.timeout_minutes) {
        errors.push(ValidationError::WarningOutOfRange {
            warning: timer.warning_minutes,
            timeout: timer.timeout_minutes,
        });
    }

    if timer.tick_interval_ms == 0 {
        errors.push(ValidationError::ZeroTickInterval);
    } else if timer.timeout_minutes.is_finite() && timer.timeout_minutes > 0.0 {
        let timeout_ms = timer.timeout_minutes * 60_000.0;
        if timer.tick_interval_ms as f64 > timeout_ms {
            errors.push(ValidationError::TickIntervalTooLarge {
                tick_ms: timer.tick_interval_ms,
                timeout_ms,
            });
        }
    }

    if config.storage.namespace.trim().is_empty() {
        errors.push(ValidationError::EmptyNamespace);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
