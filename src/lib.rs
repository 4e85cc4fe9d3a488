//! Session-aware API toolkit.
//!
//! - [`http`]: versioned API client with pagination and session timeout detection
//! - [`timer`]: drift-corrected session timer
//! - [`storage`]: namespaced key/value storage over pluggable backends
//! - [`utils`]: chunking, tree flattening and record helpers

pub mod config;
pub mod http;
pub mod observability;
pub mod storage;
pub mod timer;
pub mod ui;
pub mod utils;

pub use config::ToolkitConfig;
pub use http::{ApiClient, ApiError, RequestOptions};
pub use storage::NamespacedStorage;
pub use timer::SessionTimer;
