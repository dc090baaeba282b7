//! Route table API

use crate::api::common::{compartment_params, OciApiResource};
use crate::api::{ApiError, Client};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRule {
    pub network_entity_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteTable {
    pub id: String,
    pub compartment_id: String,
    pub vcn_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub route_rules: Vec<RouteRule>,
    pub lifecycle_state: String,
}

impl OciApiResource for RouteTable {
    fn api_path() -> &'static str {
        "/20160918/routeTables"
    }
}

pub struct RouteTablesApi<'a> {
    client: &'a Client,
}

impl<'a> RouteTablesApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// GET /20160918/routeTables?compartmentId=..
    pub async fn list(
        &self,
        compartment_id: &str,
        vcn_id: Option<&str>,
        lifecycle_state: Option<&str>,
    ) -> Result<Vec<RouteTable>, ApiError> {
        let params =
            compartment_params(compartment_id, lifecycle_state).add_optional("vcnId", vcn_id);
        self.client.list_resources(&params).await
    }

    /// GET /20160918/routeTables/{rtId}
    pub async fn get(&self, rt_id: &str) -> Result<RouteTable, ApiError> {
        self.client.get_resource(rt_id).await
    }

    /// DELETE /20160918/routeTables/{rtId}
    pub async fn delete(&self, rt_id: &str) -> Result<(), ApiError> {
        self.client.delete_resource::<RouteTable>(rt_id).await
    }
}
