//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters)
//!
//! Consumers:
//!     → stdout via tracing-subscriber
//!     → any metrics recorder the host installs
//! ```
//!
//! # Design Decisions
//! - Structured logging for machine parsing
//! - Request ID flows through the request span
//! - Metrics are cheap; without a recorder they are no-ops

pub mod logging;
pub mod metrics;

#[cfg(test)]
pub(crate) mod capture;
