//! Internet gateway API

use crate::api::common::{compartment_params, OciApiResource};
use crate::api::{ApiError, Client};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InternetGateway {
    pub id: String,
    pub compartment_id: String,
    pub vcn_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_enabled: Option<bool>,
    pub lifecycle_state: String,
}

impl OciApiResource for InternetGateway {
    fn api_path() -> &'static str {
        "/20160918/internetGateways"
    }
}

pub struct InternetGatewaysApi<'a> {
    client: &'a Client,
}

impl<'a> InternetGatewaysApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// GET /20160918/internetGateways?compartmentId=..
    pub async fn list(
        &self,
        compartment_id: &str,
        vcn_id: Option<&str>,
        lifecycle_state: Option<&str>,
    ) -> Result<Vec<InternetGateway>, ApiError> {
        let params =
            compartment_params(compartment_id, lifecycle_state).add_optional("vcnId", vcn_id);
        self.client.list_resources(&params).await
    }

    /// GET /20160918/internetGateways/{igId}
    pub async fn get(&self, ig_id: &str) -> Result<InternetGateway, ApiError> {
        self.client.get_resource(ig_id).await
    }

    /// DELETE /20160918/internetGateways/{igId}
    pub async fn delete(&self, ig_id: &str) -> Result<(), ApiError> {
        self.client.delete_resource::<InternetGateway>(ig_id).await
    }
}
