//! Virtual cloud network API

use crate::api::common::{compartment_params, OciApiResource};
use crate::api::{ApiError, Client};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vcn {
    pub id: String,
    pub compartment_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cidr_block: Option<String>,
    #[serde(default)]
    pub cidr_blocks: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_route_table_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_security_list_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_dhcp_options_id: Option<String>,
    pub lifecycle_state: String,
    #[serde(default)]
    pub freeform_tags: HashMap<String, String>,
}

impl Vcn {
    /// Route table, security list and DHCP options created with the VCN
    pub fn default_resource_ids(&self) -> impl Iterator<Item = &str> {
        [
            &self.default_route_table_id,
            &self.default_security_list_id,
            &self.default_dhcp_options_id,
        ]
        .into_iter()
        .filter_map(|id| id.as_deref())
    }
}

impl OciApiResource for Vcn {
    fn api_path() -> &'static str {
        "/20160918/vcns"
    }
}

/// VCN operations
pub struct VcnsApi<'a> {
    client: &'a Client,
}

impl<'a> VcnsApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// GET /20160918/vcns?compartmentId=..
    pub async fn list(
        &self,
        compartment_id: &str,
        lifecycle_state: Option<&str>,
    ) -> Result<Vec<Vcn>, ApiError> {
        self.client
            .list_resources(&compartment_params(compartment_id, lifecycle_state))
            .await
    }

    /// GET /20160918/vcns/{vcnId}
    pub async fn get(&self, vcn_id: &str) -> Result<Vcn, ApiError> {
        self.client.get_resource(vcn_id).await
    }

    /// DELETE /20160918/vcns/{vcnId}
    pub async fn delete(&self, vcn_id: &str) -> Result<(), ApiError> {
        self.client.delete_resource::<Vcn>(vcn_id).await
    }
}
