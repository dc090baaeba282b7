//! Subnet API

use crate::api::common::{compartment_params, OciApiResource};
use crate::api::{ApiError, Client};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subnet {
    pub id: String,
    pub compartment_id: String,
    pub vcn_id: String,
    pub cidr_block: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_table_id: Option<String>,
    #[serde(default)]
    pub prohibit_public_ip_on_vnic: bool,
    pub lifecycle_state: String,
}

impl OciApiResource for Subnet {
    fn api_path() -> &'static str {
        "/20160918/subnets"
    }
}

pub struct SubnetsApi<'a> {
    client: &'a Client,
}

impl<'a> SubnetsApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// GET /20160918/subnets?compartmentId=..&vcnId=..
    pub async fn list(
        &self,
        compartment_id: &str,
        vcn_id: Option<&str>,
        lifecycle_state: Option<&str>,
    ) -> Result<Vec<Subnet>, ApiError> {
        let params =
            compartment_params(compartment_id, lifecycle_state).add_optional("vcnId", vcn_id);
        self.client.list_resources(&params).await
    }

    /// GET /20160918/subnets/{subnetId}
    pub async fn get(&self, subnet_id: &str) -> Result<Subnet, ApiError> {
        self.client.get_resource(subnet_id).await
    }

    /// DELETE /20160918/subnets/{subnetId}
    pub async fn delete(&self, subnet_id: &str) -> Result<(), ApiError> {
        self.client.delete_resource::<Subnet>(subnet_id).await
    }
}
