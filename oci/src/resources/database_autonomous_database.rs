//! `oci_database_autonomous_database`: representations, destroy check and sweeper

use crate::api::{ApiError, Client, OracleClients};
use acctest::{
    generate_data_source_from_representation_map, generate_resource_from_representation_map,
    random_string, DestroyTarget, InstanceState, RepType, Representation, RepresentationGroup,
    RepresentationMap, RepresentationMode, SweepContext, SweepTarget, SweeperRegistry, Value,
};
use async_trait::async_trait;
use std::sync::OnceLock;
use std::time::Duration;

pub const RESOURCE_TYPE: &str = "oci_database_autonomous_database";
pub const RESOURCE_NAME: &str = "test_autonomous_database";
pub const SWEEPER_NAME: &str = "DatabaseAutonomousDatabase";

/// The service needs a few minutes after provisioning before an update is accepted
pub const UPDATE_DELAY: Duration = Duration::from_secs(3 * 60);

/// Attributes the service never returns on read
pub const IMPORT_IGNORE: &[&str] = &["admin_password", "lifecycle_details"];

/// Database name shared by every config rendered in this process: a letter
/// followed by up to 13 alphanumerics
pub fn adb_name() -> &'static str {
    static NAME: OnceLock<String> = OnceLock::new();
    NAME.get_or_init(|| format!("adb{}", random_string(11)))
}

pub fn autonomous_database_representation() -> &'static RepresentationMap {
    static REP: OnceLock<RepresentationMap> = OnceLock::new();
    REP.get_or_init(|| {
        RepresentationMap::new()
            .field(
                "admin_password",
                Representation::required("BEstrO0ng_#11").with_update("BEstrO0ng_#12"),
            )
            .required("compartment_id", "${var.compartment_id}")
            .required("cpu_core_count", 1)
            .required("data_storage_size_in_tbs", 1)
            .required("db_name", adb_name())
            .optional("db_workload", "OLTP")
            .optional_with_update("display_name", "example_autonomous_database", "displayName2")
            .optional_with_update(
                "freeform_tags",
                Value::map([("Department", "Finance")]),
                Value::map([("Department", "Accounting")]),
            )
            .optional_with_update("is_auto_scaling_enabled", false, true)
            .optional("license_model", "LICENSE_INCLUDED")
    })
}

pub fn autonomous_database_data_source_representation() -> &'static RepresentationMap {
    static REP: OnceLock<RepresentationMap> = OnceLock::new();
    REP.get_or_init(|| {
        RepresentationMap::new()
            .required("compartment_id", "${var.compartment_id}")
            .optional("db_workload", "OLTP")
            .optional_with_update("display_name", "example_autonomous_database", "displayName2")
            .optional("state", "AVAILABLE")
            .group(
                "filter",
                RepresentationGroup::required(
                    RepresentationMap::new()
                        .required("name", "id")
                        .required(
                            "values",
                            Value::list(["${oci_database_autonomous_database.test_autonomous_database.id}"]),
                        ),
                ),
            )
    })
}

pub fn autonomous_database_resource(rep_type: RepType, mode: RepresentationMode) -> String {
    generate_resource_from_representation_map(
        RESOURCE_TYPE,
        RESOURCE_NAME,
        rep_type,
        mode,
        autonomous_database_representation(),
    )
}

pub fn autonomous_database_data_source_config(mode: RepresentationMode) -> String {
    generate_data_source_from_representation_map(
        "oci_database_autonomous_databases",
        "test_autonomous_databases",
        RepType::Optional,
        mode,
        autonomous_database_data_source_representation(),
    )
}

pub struct DatabaseAutonomousDatabase {
    client: Client,
}

impl DatabaseAutonomousDatabase {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DestroyTarget for DatabaseAutonomousDatabase {
    type Error = ApiError;

    fn resource_type(&self) -> &str {
        RESOURCE_TYPE
    }

    fn deleted_states(&self) -> &[&str] {
        &["TERMINATED"]
    }

    async fn fetch_lifecycle_state(
        &self,
        instance: &InstanceState,
    ) -> Result<Option<String>, ApiError> {
        let adb = self.client.autonomous_databases().get(&instance.id).await?;
        Ok(Some(adb.lifecycle_state))
    }
}

#[async_trait]
impl SweepTarget for DatabaseAutonomousDatabase {
    type Error = ApiError;

    fn name(&self) -> &str {
        SWEEPER_NAME
    }

    fn id_kind(&self) -> &str {
        "AutonomousDatabaseId"
    }

    async fn list_ids(
        &self,
        compartment_id: &str,
        _ctx: &SweepContext,
    ) -> Result<Vec<String>, ApiError> {
        let databases = self
            .client
            .autonomous_databases()
            .list(compartment_id, Some("AVAILABLE"))
            .await?;
        Ok(databases.into_iter().map(|d| d.id).collect())
    }

    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client.autonomous_databases().delete(id).await
    }

    async fn lifecycle_state(&self, id: &str) -> Result<Option<String>, ApiError> {
        Ok(Some(self.client.autonomous_databases().get(id).await?.lifecycle_state))
    }

    fn is_pending(&self, lifecycle_state: &str) -> bool {
        lifecycle_state != "TERMINATED"
    }
}

pub fn register(registry: &mut SweeperRegistry, clients: &OracleClients) {
    registry.add_sweeper(
        SWEEPER_NAME,
        "autonomous_database",
        DatabaseAutonomousDatabase::new(clients.database.clone()),
    );
}
