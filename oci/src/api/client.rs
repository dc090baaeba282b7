use reqwest::header::AUTHORIZATION;
use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

use super::common::{ApiErrorResponse, ApiQueryParams, OciApiResource};
use super::error::ApiError;

pub const OPC_REQUEST_ID: &str = "opc-request-id";
pub const OPC_NEXT_PAGE: &str = "opc-next-page";

/// OCI REST client for one service endpoint
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http_client: reqwest::Client,
    base_url: String,
    auth_header: Option<String>,
    retry_policy: RetryPolicy,
}

/// Shared retry policy passed to every request: exponential backoff on
/// throttling, server errors and connection failures
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    pub timeout_seconds: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff_ms: 100,
            max_backoff_ms: 10000,
            timeout_seconds: 60,
        }
    }
}

impl RetryPolicy {
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    fn backoff(&self, attempt: u32) -> Duration {
        let ms = self
            .initial_backoff_ms
            .saturating_mul(2_u64.saturating_pow(attempt.saturating_sub(1)));
        Duration::from_millis(ms.min(self.max_backoff_ms))
    }
}

impl Client {
    /// Create a new API client with the default retry policy
    pub fn new(endpoint: &str, auth_token: Option<&str>) -> Result<Self, ApiError> {
        Self::with_policy(endpoint, auth_token, RetryPolicy::default())
    }

    pub fn with_policy(
        endpoint: &str,
        auth_token: Option<&str>,
        retry_policy: RetryPolicy,
    ) -> Result<Self, ApiError> {
        url::Url::parse(endpoint)?;

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(retry_policy.timeout_seconds))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                http_client,
                base_url: endpoint.trim_end_matches('/').to_string(),
                auth_header: auth_token.map(|t| format!("Bearer {}", t)),
                retry_policy,
            }),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.inner.base_url
    }

    /// Execute a GET request and decode the JSON body
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.execute_with_retry(Method::GET, path).await?;
        parse_success_response(response).await
    }

    /// Execute a DELETE request; OCI answers deletes with an empty body
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.execute_with_retry(Method::DELETE, path).await?;
        Ok(())
    }

    /// GET every page of a list operation, following `opc-next-page`
    pub async fn list_all<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &ApiQueryParams,
    ) -> Result<Vec<T>, ApiError> {
        let mut items = Vec::new();
        let mut params = params.clone();

        loop {
            let full_path = format!("{}{}", path, params.to_query_string());
            let response = self.execute_with_retry(Method::GET, &full_path).await?;
            let next_page = response
                .headers()
                .get(OPC_NEXT_PAGE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);

            let page: Vec<T> = parse_success_response(response).await?;
            items.extend(page);

            match next_page {
                Some(page) if !page.is_empty() => params = params.with_page(&page),
                _ => break,
            }
        }

        Ok(items)
    }

    pub async fn get_resource<R: OciApiResource>(&self, id: &str) -> Result<R, ApiError> {
        self.get(&R::resource_path(id)).await
    }

    pub async fn list_resources<R: OciApiResource>(
        &self,
        params: &ApiQueryParams,
    ) -> Result<Vec<R>, ApiError> {
        self.list_all(R::api_path(), params).await
    }

    pub async fn delete_resource<R: OciApiResource>(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&R::resource_path(id)).await
    }

    /// Execute request with retry logic
    async fn execute_with_retry(&self, method: Method, path: &str) -> Result<Response, ApiError> {
        let policy = &self.inner.retry_policy;
        let url = format!("{}{}", self.inner.base_url, path);
        let mut attempt = 0;
        let mut last_error = None;

        while attempt <= policy.max_retries {
            if attempt > 0 {
                let backoff = policy.backoff(attempt);
                tracing::debug!(
                    "Retrying {} {} after {:?} (attempt {})",
                    method,
                    path,
                    backoff,
                    attempt
                );
                tokio::time::sleep(backoff).await;
            }

            tracing::debug!("{} request to: {}", method, url);
            let mut request = self.inner.http_client.request(method.clone(), &url);
            if let Some(auth) = &self.inner.auth_header {
                request = request.header(AUTHORIZATION, auth);
            }

            match request.send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response);
                    }

                    if status == StatusCode::UNAUTHORIZED {
                        return Err(ApiError::AuthError);
                    }

                    if status == StatusCode::TOO_MANY_REQUESTS {
                        last_error = Some(ApiError::RateLimited);
                    } else if status.is_server_error() {
                        last_error = Some(handle_error_response(response).await);
                    } else {
                        return Err(handle_error_response(response).await);
                    }
                }
                Err(e) => {
                    if e.is_timeout() {
                        last_error = Some(ApiError::Timeout(policy.timeout_seconds));
                    } else if e.is_connect() {
                        last_error = Some(ApiError::ServiceUnavailable);
                    } else {
                        return Err(ApiError::RequestError(e));
                    }
                }
            }

            attempt += 1;
        }

        Err(last_error.unwrap_or(ApiError::ServiceUnavailable))
    }
}

/// Parse successful response
async fn parse_success_response<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let text = response.text().await?;
    tracing::trace!("API response body: {}", text);

    serde_json::from_str::<T>(&text).map_err(|e| {
        tracing::error!("Failed to deserialize response: {}, body: {}", e, text);
        ApiError::ParseError(format!("Failed to parse response: {}", e))
    })
}

/// Turn a non-success response into a service error
async fn handle_error_response(response: Response) -> ApiError {
    let status = response.status().as_u16();
    let opc_request_id = response
        .headers()
        .get(OPC_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());

    let (code, message) = match serde_json::from_str::<ApiErrorResponse>(&text) {
        Ok(body) => (body.code, body.message),
        Err(_) => (status.to_string(), text),
    };

    ApiError::Service {
        status,
        code,
        message,
        opc_request_id,
    }
}
