//! Object storage bucket and namespace API
//!
//! Buckets are addressed by namespace and name rather than by OCID, so they
//! do not go through the generic [`OciApiResource`](crate::api::OciApiResource) paths.

use crate::api::common::ApiQueryParams;
use crate::api::{ApiError, Client};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bucket {
    pub name: String,
    pub namespace: String,
    pub compartment_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_tier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_access_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    #[serde(default)]
    pub freeform_tags: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketSummary {
    pub name: String,
    pub namespace: String,
    pub compartment_id: String,
}

/// `n/{namespace}/b/{bucket}`, the import id of a bucket
pub fn bucket_composite_id(namespace: &str, bucket: &str) -> String {
    format!("n/{}/b/{}", namespace, bucket)
}

/// Splits a composite id back into `(namespace, bucket)`
pub fn parse_bucket_composite_id(id: &str) -> Option<(String, String)> {
    let parts: Vec<&str> = id.split('/').collect();
    match parts.as_slice() {
        ["n", namespace, "b", bucket] if !namespace.is_empty() && !bucket.is_empty() => {
            Some((namespace.to_string(), bucket.to_string()))
        }
        _ => None,
    }
}

fn bucket_path(namespace: &str, bucket: &str) -> String {
    format!(
        "/n/{}/b/{}",
        urlencoding::encode(namespace),
        urlencoding::encode(bucket)
    )
}

pub struct BucketsApi<'a> {
    client: &'a Client,
}

impl<'a> BucketsApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// GET /n/ returns the tenancy namespace as a bare JSON string
    pub async fn namespace(&self) -> Result<String, ApiError> {
        self.client.get("/n/").await
    }

    /// GET /n/{namespace}/b?compartmentId=..
    pub async fn list(
        &self,
        namespace: &str,
        compartment_id: &str,
    ) -> Result<Vec<BucketSummary>, ApiError> {
        let params = ApiQueryParams::new().add("compartmentId", compartment_id);
        self.client
            .list_all(&format!("/n/{}/b", urlencoding::encode(namespace)), &params)
            .await
    }

    /// GET /n/{namespace}/b/{bucket}
    pub async fn get(&self, namespace: &str, bucket: &str) -> Result<Bucket, ApiError> {
        self.client.get(&bucket_path(namespace, bucket)).await
    }

    /// DELETE /n/{namespace}/b/{bucket}
    pub async fn delete(&self, namespace: &str, bucket: &str) -> Result<(), ApiError> {
        self.client.delete(&bucket_path(namespace, bucket)).await
    }
}
