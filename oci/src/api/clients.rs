//! One client per OCI service used by the suite

use super::client::{Client, RetryPolicy};
use super::error::ApiError;
use acctest::TestConfig;

pub const ENDPOINT_OVERRIDE: &str = "OCI_ENDPOINT_OVERRIDE";
pub const AUTH_TOKEN: &str = "OCI_AUTH_TOKEN";

#[derive(Clone)]
pub struct OracleClients {
    pub core: Client,
    pub database: Client,
    pub object_storage: Client,
}

impl OracleClients {
    /// Clients for the public endpoints of `region`
    pub fn for_region(region: &str, auth_token: Option<&str>) -> Result<Self, ApiError> {
        let endpoint = |service: &str| format!("https://{}.{}.oraclecloud.com", service, region);
        Ok(Self {
            core: Client::new(&endpoint("iaas"), auth_token)?,
            database: Client::new(&endpoint("database"), auth_token)?,
            object_storage: Client::new(&endpoint("objectstorage"), auth_token)?,
        })
    }

    /// Every service served from a single base URL
    pub fn with_endpoint(
        endpoint: &str,
        auth_token: Option<&str>,
        retry_policy: RetryPolicy,
    ) -> Result<Self, ApiError> {
        let client = Client::with_policy(endpoint, auth_token, retry_policy)?;
        Ok(Self {
            core: client.clone(),
            database: client.clone(),
            object_storage: client,
        })
    }

    /// Builds clients from `OCI_ENDPOINT_OVERRIDE` when set, otherwise from
    /// the configured region
    pub fn from_config(config: &TestConfig) -> Result<Self, ApiError> {
        let auth_token = std::env::var(AUTH_TOKEN).ok().filter(|t| !t.is_empty());

        if let Some(endpoint) = std::env::var(ENDPOINT_OVERRIDE).ok().filter(|e| !e.is_empty()) {
            tracing::info!("using endpoint override {}", endpoint);
            return Self::with_endpoint(&endpoint, auth_token.as_deref(), RetryPolicy::default());
        }

        let region = config.region.as_deref().ok_or_else(|| {
            ApiError::Configuration(format!(
                "{} or {} must be set",
                acctest::config::REGION,
                ENDPOINT_OVERRIDE
            ))
        })?;
        Self::for_region(region, auth_token.as_deref())
    }
}
