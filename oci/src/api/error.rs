use acctest::ServiceFailure;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error(
        "Service error: {code}. {message}. http status code: {status}. Opc request id: {}",
        .opc_request_id.as_deref().unwrap_or("-")
    )]
    Service {
        status: u16,
        code: String,
        message: String,
        opc_request_id: Option<String>,
    },

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Authentication failed")]
    AuthError,

    #[error("Request timeout after {0} seconds")]
    Timeout(u64),

    #[error("Too many requests, rate limited")]
    RateLimited,

    #[error("Service unavailable, retry later")]
    ServiceUnavailable,

    #[error("Invalid client configuration: {0}")]
    Configuration(String),

    #[error("Invalid resource id: {0}")]
    InvalidId(String),
}

impl ApiError {
    /// HTTP status carried by the error, if the service answered at all
    pub fn http_status(&self) -> Option<u16> {
        match self {
            ApiError::Service { status, .. } => Some(*status),
            ApiError::AuthError => Some(401),
            ApiError::RateLimited => Some(429),
            ApiError::RequestError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.http_status() == Some(404)
    }

    pub fn opc_request_id(&self) -> Option<&str> {
        match self {
            ApiError::Service { opc_request_id, .. } => opc_request_id.as_deref(),
            _ => None,
        }
    }
}

impl ServiceFailure for ApiError {
    fn http_status(&self) -> Option<u16> {
        ApiError::http_status(self)
    }
}
