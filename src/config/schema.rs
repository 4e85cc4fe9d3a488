//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the toolkit.
//! All types derive Serde traits for deserialization from config files.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Longest accepted session timeout (one leap year).
pub const MAX_TIMEOUT_MINUTES: f64 = 366.0 * 24.0 * 60.0;

/// Root configuration for the toolkit.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ToolkitConfig {
    /// HTTP access layer settings.
    pub api: ApiConfig,

    /// Session timer settings.
    pub session_timer: TimerSettings,

    /// Browser-style storage settings.
    pub storage: StorageConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// HTTP access layer configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Origin of the API server (e.g., "https://app.example.com").
    pub base_url: String,

    /// Path appended to the origin before any route (e.g., "/api").
    pub api_path: String,

    /// Version segment prefixed to ordinary routes (e.g., "/v3").
    pub version_prefix: String,

    /// Logical route names mapped to literal paths outside the version convention.
    pub special_routes: BTreeMap<String, String>,

    /// Runtime environment name. "development" enables local error logging.
    pub environment: String,

    /// Send and store cookies with every request.
    pub with_credentials: bool,

    /// Detect expired sessions on 403 responses.
    pub session_timeout_detection: bool,

    /// Where to send the user after a session timeout. Reloads when unset.
    pub session_timeout_redirect: Option<String>,

    /// Transport-level request timeout in seconds.
    pub request_timeout_secs: Option<u64>,

    /// Static headers attached to every request.
    pub headers: BTreeMap<String, String>,
}

impl ApiConfig {
    /// True when running in development mode.
    pub fn dev_mode(&self) -> bool {
        self.environment.eq_ignore_ascii_case("development")
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        let mut special_routes = BTreeMap::new();
        special_routes.insert("_csrf-cookie".to_string(), "/csrf-cookie".to_string());

        Self {
            base_url: "http://localhost:8000".to_string(),
            api_path: "/api".to_string(),
            version_prefix: "/v3".to_string(),
            special_routes,
            environment: "production".to_string(),
            with_credentials: true,
            session_timeout_detection: false,
            session_timeout_redirect: None,
            request_timeout_secs: None,
            headers: BTreeMap::new(),
        }
    }
}

/// Session timer configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimerSettings {
    /// Total session length in minutes.
    pub timeout_minutes: f64,

    /// How many minutes before the timeout the warning fires.
    pub warning_minutes: f64,

    /// Cadence of the elapsed-time check in milliseconds.
    pub tick_interval_ms: u64,
}

impl TimerSettings {
    /// Total timeout as a duration.
    pub fn timeout(&self) -> Duration {
        minutes(self.timeout_minutes)
    }

    /// Warning lead time as a duration.
    pub fn warning_lead(&self) -> Duration {
        minutes(self.warning_minutes)
    }

    /// Tick cadence as a duration.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            timeout_minutes: 240.0,
            warning_minutes: 0.5,
            tick_interval_ms: 1000,
        }
    }
}

/// Non-positive values map to zero; anything beyond the ceiling is capped.
fn minutes(value: f64) -> Duration {
    if value.is_nan() || value <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(value.min(MAX_TIMEOUT_MINUTES) * 60.0).unwrap_or(Duration::ZERO)
}

/// Storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Key under which all toolkit data is kept in the backing store.
    pub namespace: String,

    /// File used by the persistent backend.
    pub local_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            namespace: "test-app".to_string(),
            local_path: "api-toolkit-storage.json".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ToolkitConfig::default();
        assert_eq!(config.api.version_prefix, "/v3");
        assert_eq!(
            config.api.special_routes.get("_csrf-cookie").map(String::as_str),
            Some("/csrf-cookie")
        );
        assert!(!config.api.dev_mode());
        assert_eq!(config.session_timer.timeout(), Duration::from_secs(240 * 60));
        assert_eq!(config.session_timer.warning_lead(), Duration::from_secs(30));
    }

    #[test]
    fn test_partial_toml() {
        let config: ToolkitConfig = toml::from_str(
            r#"
            [api]
            environment = "Development"
            session_timeout_detection = true

            [session_timer]
            timeout_minutes = 1.0
            warning_minutes = 0.1
            "#,
        )
        .unwrap();

        assert!(config.api.dev_mode());
        assert!(config.api.session_timeout_detection);
        assert_eq!(config.api.api_path, "/api");
        assert_eq!(config.session_timer.warning_lead(), Duration::from_secs(6));
        assert_eq!(config.storage.namespace, "test-app");
    }

    #[test]
    fn test_out_of_range_minutes_do_not_panic() {
        let settings = TimerSettings {
            timeout_minutes: 1e300,
            warning_minutes: f64::NAN,
            tick_interval_ms: 1000,
        };
        assert_eq!(
            settings.timeout(),
            Duration::from_secs((MAX_TIMEOUT_MINUTES * 60.0) as u64)
        );
        assert_eq!(settings.warning_lead(), Duration::ZERO);

        let settings = TimerSettings {
            timeout_minutes: f64::INFINITY,
            ..TimerSettings::default()
        };
        assert_eq!(
            settings.timeout(),
            Duration::from_secs((MAX_TIMEOUT_MINUTES * 60.0) as u64)
        );
    }
}
