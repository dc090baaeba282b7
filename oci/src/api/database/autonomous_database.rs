//! Autonomous database API

use crate::api::common::{compartment_params, OciApiResource};
use crate::api::{ApiError, Client};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutonomousDatabase {
    pub id: String,
    pub compartment_id: String,
    pub db_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_core_count: Option<u32>,
    #[serde(rename = "dataStorageSizeInTBs", skip_serializing_if = "Option::is_none")]
    pub data_storage_size_in_tbs: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_workload: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_free_tier: Option<bool>,
    pub lifecycle_state: String,
    #[serde(default)]
    pub freeform_tags: HashMap<String, String>,
}

impl OciApiResource for AutonomousDatabase {
    fn api_path() -> &'static str {
        "/20160918/autonomousDatabases"
    }
}

pub struct AutonomousDatabasesApi<'a> {
    client: &'a Client,
}

impl<'a> AutonomousDatabasesApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// GET /20160918/autonomousDatabases?compartmentId=..
    pub async fn list(
        &self,
        compartment_id: &str,
        lifecycle_state: Option<&str>,
    ) -> Result<Vec<AutonomousDatabase>, ApiError> {
        self.client
            .list_resources(&compartment_params(compartment_id, lifecycle_state))
            .await
    }

    /// GET /20160918/autonomousDatabases/{autonomousDatabaseId}
    pub async fn get(&self, id: &str) -> Result<AutonomousDatabase, ApiError> {
        self.client.get_resource(id).await
    }

    /// DELETE /20160918/autonomousDatabases/{autonomousDatabaseId}
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client.delete_resource::<AutonomousDatabase>(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_helpers::create_test_client;
    use mockito::Server;

    #[tokio::test]
    async fn get_decodes_sizes() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/20160918/autonomousDatabases/ocid1.autonomousdatabase.oc1..aaaa")
            .with_status(200)
            .with_body(
                r#"{
                    "id": "ocid1.autonomousdatabase.oc1..aaaa",
                    "compartmentId": "ocid1.compartment.oc1..cccc",
                    "dbName": "adbdb1",
                    "cpuCoreCount": 1,
                    "dataStorageSizeInTBs": 1,
                    "dbWorkload": "OLTP",
                    "lifecycleState": "PROVISIONING"
                }"#,
            )
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let adb = AutonomousDatabasesApi::new(&client)
            .get("ocid1.autonomousdatabase.oc1..aaaa")
            .await
            .unwrap();

        assert_eq!(adb.db_name, "adbdb1");
        assert_eq!(adb.cpu_core_count, Some(1));
        assert_eq!(adb.db_workload.as_deref(), Some("OLTP"));
        assert!(adb.freeform_tags.is_empty());
    }
}
