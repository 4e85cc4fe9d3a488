//! Per-request options and the raw response type.

use std::collections::BTreeMap;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::http::error::{ApiError, ApiResult};

/// Query string parameters.
pub type QueryParams = BTreeMap<String, String>;

/// Options applied to a single request.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Query parameters. Required by `get_all_pages`.
    pub params: Option<QueryParams>,
    /// Extra headers for this request only.
    pub headers: HeaderMap,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options carrying a query parameter set, as `get_all_pages` requires.
    pub fn with_params(params: QueryParams) -> Self {
        Self {
            params: Some(params),
            ..Self::default()
        }
    }

    /// Add or replace one query parameter.
    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params
            .get_or_insert_with(QueryParams::new)
            .insert(key.into(), value.to_string());
        self
    }

    /// Add a header; invalid names or values are rejected.
    pub fn header(mut self, name: &str, value: &str) -> ApiResult<Self> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| ApiError::Setup(format!("invalid header name '{name}': {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| ApiError::Setup(format!("invalid header value for '{name}': {e}")))?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Copy of these options asking for a specific page.
    pub(crate) fn for_page(&self, page: u64) -> Self {
        let mut params = self.params.clone().unwrap_or_default();
        params.insert("page".to_string(), page.to_string());
        Self {
            params: Some(params),
            headers: self.headers.clone(),
        }
    }
}

/// A fully buffered response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// Decode the body as JSON. An empty body decodes as `null`.
    pub fn json<T: DeserializeOwned>(&self) -> ApiResult<T> {
        let body: &[u8] = if self.body.is_empty() { b"null" } else { &self.body };
        serde_json::from_slice(body).map_err(ApiError::Decode)
    }

    /// `Content-Type` header, if present and readable.
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
    }
}
