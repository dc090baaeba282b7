//! Common types and utilities for the OCI REST API

use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Error body returned by every OCI service
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub code: String,
    pub message: String,
}

/// A resource addressable as `<api_path>/<id>` on its service endpoint
pub trait OciApiResource: DeserializeOwned + Send {
    fn api_path() -> &'static str;

    fn resource_path(id: &str) -> String {
        format!("{}/{}", Self::api_path(), id)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ApiQueryParams {
    params: Vec<(String, String)>,
}

impl ApiQueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<K: Into<String>, V: ToString>(mut self, key: K, value: V) -> Self {
        self.params.push((key.into(), value.to_string()));
        self
    }

    pub fn add_optional<K: Into<String>, V: ToString>(mut self, key: K, value: Option<V>) -> Self {
        if let Some(v) = value {
            self.params.push((key.into(), v.to_string()));
        }
        self
    }

    /// Copy with the `page` token set, replacing any earlier one
    pub fn with_page(&self, page: &str) -> Self {
        let mut next = self.clone();
        next.params.retain(|(k, _)| k != "page");
        next.add("page", page)
    }

    pub fn to_query_string(&self) -> String {
        if self.params.is_empty() {
            String::new()
        } else {
            format!(
                "?{}",
                self.params
                    .iter()
                    .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
                    .collect::<Vec<_>>()
                    .join("&")
            )
        }
    }
}

/// Standard listing filter: a compartment, optionally narrowed to one
/// lifecycle state
pub fn compartment_params(compartment_id: &str, lifecycle_state: Option<&str>) -> ApiQueryParams {
    ApiQueryParams::new()
        .add("compartmentId", compartment_id)
        .add_optional("lifecycleState", lifecycle_state)
}
