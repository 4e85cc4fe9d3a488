//! HTTP access layer.
//!
//! # Data Flow
//! ```text
//! caller (get / get_blob / get_all_pages / post / put / delete)
//!     → routes.rs (special route or version prefix)
//!     → interceptor.rs (indicator start)
//!     → reqwest (credentials, params, JSON body)
//!     → interceptor.rs (indicator end, then error side effects)
//!     → client.rs (payload unwrapping, page aggregation)
//! ```
//!
//! # Design Decisions
//! - One client per process; the only state is the one-shot timeout flag
//! - Errors are observed and always propagated, never swallowed
//! - Pagination is all-or-nothing

pub mod client;
pub mod error;
pub mod interceptor;
pub mod pagination;
pub mod request;
pub mod routes;

pub use client::{ApiClient, ApiClientBuilder};
pub use error::{ApiError, ApiResult, ServerErrorResponse};
pub use pagination::{AllPages, Page, PageMeta};
pub use request::{ApiResponse, QueryParams, RequestOptions};
pub use routes::RouteTable;
