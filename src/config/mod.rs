//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → loader.rs (API_URL / APP_ENV overrides)
//!     → validation.rs (semantic checks)
//!     → ToolkitConfig (validated, immutable)
//!     → handed to ApiClient, SessionTimer, NamespacedStorage
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_or_default, ConfigError};
pub use schema::ApiConfig;
pub use schema::ObservabilityConfig;
pub use schema::StorageConfig;
pub use schema::TimerSettings;
pub use schema::ToolkitConfig;
