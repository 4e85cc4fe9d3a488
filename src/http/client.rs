//! API client.
//!
//! # Responsibilities
//! - Resolve logical routes and send requests through one reqwest client
//! - Unwrap payloads for the JSON verbs, return raw responses for blobs
//! - Aggregate paginated listings concurrently
//! - Run every request through the interceptor

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::try_join_all;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::Instrument;
use url::Url;
use uuid::Uuid;

use crate::config::ApiConfig;
use crate::http::error::{ApiError, ApiResult};
use crate::http::interceptor::Interceptor;
use crate::http::pagination::{AllPages, Page};
use crate::http::request::{ApiResponse, RequestOptions};
use crate::http::routes::RouteTable;
use crate::observability::metrics;
use crate::ui::{
    CallIndicator, CredentialProvider, LogNavigator, LogNotifier, Navigator, NoopIndicator, Notifier,
};

/// Header carrying the per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Page counts above this are still fetched, but logged as suspicious.
pub const LARGE_PAGE_COUNT: u64 = 500;

/// Session-aware client for the versioned API.
pub struct ApiClient {
    http: reqwest::Client,
    base: String,
    routes: RouteTable,
    credentials: Option<Arc<dyn CredentialProvider>>,
    interceptor: Interceptor,
}

/// Builder wiring an [`ApiClient`] to its collaborators.
pub struct ApiClientBuilder {
    config: ApiConfig,
    indicator: Arc<dyn CallIndicator>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    credentials: Option<Arc<dyn CredentialProvider>>,
}

impl ApiClientBuilder {
    pub fn indicator(mut self, indicator: Arc<dyn CallIndicator>) -> Self {
        self.indicator = indicator;
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = navigator;
        self
    }

    pub fn credentials(mut self, credentials: Arc<dyn CredentialProvider>) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn build(self) -> ApiResult<ApiClient> {
        let config = self.config;

        let mut default_headers = HeaderMap::new();
        for (name, value) in &config.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ApiError::Setup(format!("invalid header name '{name}': {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| ApiError::Setup(format!("invalid header value for '{name}': {e}")))?;
            default_headers.insert(name, value);
        }

        let mut builder = reqwest::Client::builder()
            .default_headers(default_headers)
            .cookie_store(config.with_credentials);
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .map_err(|e| ApiError::Setup(format!("failed to build HTTP client: {e}")))?;

        let base = format!("{}{}", config.base_url.trim_end_matches('/'), config.api_path);

        tracing::info!(
            base = %base,
            version_prefix = %config.version_prefix,
            session_timeout_detection = config.session_timeout_detection,
            "API client initialized"
        );

        Ok(ApiClient {
            http,
            base,
            routes: RouteTable::new(config.version_prefix.clone(), config.special_routes.clone()),
            credentials: self.credentials,
            interceptor: Interceptor {
                indicator: self.indicator,
                notifier: self.notifier,
                navigator: self.navigator,
                dev_mode: config.dev_mode(),
                session_timeout_detection: config.session_timeout_detection,
                session_timeout_redirect: config.session_timeout_redirect.clone(),
                session_timeout_alert_shown: AtomicBool::new(false),
            },
        })
    }
}

impl ApiClient {
    /// Start building a client. Collaborators default to logging implementations.
    pub fn builder(config: ApiConfig) -> ApiClientBuilder {
        ApiClientBuilder {
            config,
            indicator: Arc::new(NoopIndicator),
            notifier: Arc::new(LogNotifier),
            navigator: Arc::new(LogNavigator),
            credentials: None,
        }
    }

    /// Client with default collaborators.
    pub fn new(config: ApiConfig) -> ApiResult<Self> {
        Self::builder(config).build()
    }

    /// Enable or disable session timeout detection.
    pub fn set_session_timeout_detection(&mut self, enabled: bool) {
        self.interceptor.session_timeout_detection = enabled;
    }

    /// Where to go after a session timeout; `None` reloads.
    pub fn set_session_timeout_redirect(&mut self, url: Option<String>) {
        self.interceptor.session_timeout_redirect = url;
    }

    /// True once this client has shown its session timeout alert.
    pub fn session_timeout_alert_shown(&self) -> bool {
        self.interceptor.timeout_alert_shown()
    }

    /// The path a logical route resolves to.
    pub fn resolve_route(&self, route: &str) -> String {
        self.routes.resolve(route)
    }

    /// GET a route and decode its JSON payload.
    pub async fn get<T: DeserializeOwned>(&self, route: &str, options: &RequestOptions) -> ApiResult<T> {
        self.execute(Method::GET, route, options, None::<&()>).await?.json()
    }

    /// GET a binary resource, keeping status and headers.
    pub async fn get_blob(&self, route: &str, options: &RequestOptions) -> ApiResult<ApiResponse> {
        self.execute(Method::GET, route, options, None::<&()>).await
    }

    /// Fetch every page of a paginated listing.
    ///
    /// Page 1 is fetched with the caller's params to learn `meta.last_page`;
    /// the remaining pages are requested concurrently and concatenated in
    /// page order. Any failed page fails the whole call.
    ///
    /// `meta.last_page` is trusted as sent: every remaining page is requested
    /// at once, however many there are. Counts above [`LARGE_PAGE_COUNT`]
    /// are logged as a warning.
    pub async fn get_all_pages<T: DeserializeOwned>(
        &self,
        route: &str,
        options: &RequestOptions,
    ) -> ApiResult<AllPages<T>> {
        if options.params.is_none() {
            return Err(ApiError::Configuration(
                "get_all_pages requires options.params".to_string(),
            ));
        }

        let first: Page<T> = self.get(route, options).await?;
        let last_page = first.last_page();

        let remaining = remaining_pages(route, last_page).map(|page| {
            let options = options.for_page(page);
            async move {
                self.get::<Page<T>>(route, &options)
                    .await
                    .map(|page| page.data)
            }
        });
        let remaining = try_join_all(remaining).await?;

        let mut data = first.data;
        for page in remaining {
            data.extend(page);
        }

        Ok(AllPages { data })
    }

    /// POST a JSON body and decode the JSON payload.
    pub async fn post<T, B>(&self, route: &str, body: &B, options: &RequestOptions) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute(Method::POST, route, options, Some(body)).await?.json()
    }

    /// PUT a JSON body and decode the JSON payload.
    pub async fn put<T, B>(&self, route: &str, body: &B, options: &RequestOptions) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute(Method::PUT, route, options, Some(body)).await?.json()
    }

    /// DELETE a route and decode the JSON payload.
    pub async fn delete<T: DeserializeOwned>(&self, route: &str, options: &RequestOptions) -> ApiResult<T> {
        self.execute(Method::DELETE, route, options, None::<&()>).await?.json()
    }

    async fn execute<B>(
        &self,
        method: Method,
        route: &str,
        options: &RequestOptions,
        body: Option<&B>,
    ) -> ApiResult<ApiResponse>
    where
        B: Serialize + ?Sized,
    {
        let path = self.routes.resolve(route);
        let request_id = Uuid::new_v4();
        let span = tracing::debug_span!(
            "api_request",
            method = %method,
            path = %path,
            request_id = %request_id
        );

        async move {
            let guard = self.interceptor.on_request();
            let result = self.dispatch(method.clone(), &path, options, body, request_id).await;
            drop(guard);

            match result {
                Ok(response) => {
                    metrics::record_request(&method, "success");
                    tracing::debug!(status = %response.status, bytes = response.body.len(), "Request completed");
                    Ok(response)
                }
                Err(err) => {
                    metrics::record_request(&method, err.kind());
                    Err(self.interceptor.on_error(err))
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn dispatch<B>(
        &self,
        method: Method,
        path: &str,
        options: &RequestOptions,
        body: Option<&B>,
        request_id: Uuid,
    ) -> ApiResult<ApiResponse>
    where
        B: Serialize + ?Sized,
    {
        let url = Url::parse(&format!("{}{}", self.base, path))
            .map_err(|e| ApiError::Setup(format!("invalid URL for '{path}': {e}")))?;

        let mut builder = self
            .http
            .request(method, url)
            .header(REQUEST_ID_HEADER, request_id.to_string());
        if let Some(credentials) = &self.credentials {
            builder = builder.headers(credentials.headers());
        }
        builder = builder.headers(options.headers.clone());
        if let Some(params) = &options.params {
            builder = builder.query(params);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let request = builder
            .build()
            .map_err(|e| ApiError::Setup(e.to_string()))?;
        let response = self.http.execute(request).await.map_err(ApiError::Network)?;

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.bytes().await.map_err(ApiError::Network)?;

        if !status.is_success() {
            return Err(ApiError::from_response(
                status,
                String::from_utf8_lossy(&bytes).into_owned(),
            ));
        }

        Ok(ApiResponse {
            status,
            headers,
            body: bytes.to_vec(),
        })
    }
}

/// Pages still to fetch after page 1.
fn remaining_pages(route: &str, last_page: u64) -> std::ops::RangeInclusive<u64> {
    if last_page > LARGE_PAGE_COUNT {
        tracing::warn!(route, last_page, "Unusually large page count, fetching every page");
    } else {
        tracing::debug!(route, last_page, "Fetching remaining pages");
    }
    2..=last_page
}
