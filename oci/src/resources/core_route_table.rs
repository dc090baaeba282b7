//! `oci_core_route_table`: representations, destroy check and sweeper

use super::{core_internet_gateway, core_vcn};
use crate::api::{ApiError, Client, OracleClients};
use acctest::{
    generate_data_source_from_representation_map, generate_resource_from_representation_map,
    DestroyTarget, InstanceState, RepType, RepresentationGroup, RepresentationMap,
    RepresentationMode, SweepContext, SweepTarget, SweeperRegistry, Value,
};
use async_trait::async_trait;
use std::sync::OnceLock;

pub const RESOURCE_TYPE: &str = "oci_core_route_table";
pub const RESOURCE_NAME: &str = "test_route_table";
pub const SWEEPER_NAME: &str = "CoreRouteTable";

pub fn route_table_route_rules_representation() -> &'static RepresentationMap {
    static REP: OnceLock<RepresentationMap> = OnceLock::new();
    REP.get_or_init(|| {
        RepresentationMap::new()
            .required(
                "network_entity_id",
                "${oci_core_internet_gateway.test_internet_gateway.id}",
            )
            .optional_with_update("description", "description", "description2")
            .optional_with_update("destination", "0.0.0.0/0", "10.0.0.0/8")
            .optional("destination_type", "CIDR_BLOCK")
    })
}

pub fn route_table_representation() -> &'static RepresentationMap {
    static REP: OnceLock<RepresentationMap> = OnceLock::new();
    REP.get_or_init(|| {
        RepresentationMap::new()
            .required("compartment_id", "${var.compartment_id}")
            .required("vcn_id", "${oci_core_vcn.test_vcn.id}")
            .optional_with_update("display_name", "MyRouteTable", "displayName2")
            .optional_with_update(
                "freeform_tags",
                Value::map([("Department", "Finance")]),
                Value::map([("Department", "Accounting")]),
            )
            .groups(
                "route_rules",
                vec![RepresentationGroup::optional(
                    route_table_route_rules_representation().clone(),
                )],
            )
    })
}

pub fn route_table_data_source_representation() -> &'static RepresentationMap {
    static REP: OnceLock<RepresentationMap> = OnceLock::new();
    REP.get_or_init(|| {
        RepresentationMap::new()
            .required("compartment_id", "${var.compartment_id}")
            .optional_with_update("display_name", "MyRouteTable", "displayName2")
            .optional("state", "AVAILABLE")
            .optional("vcn_id", "${oci_core_vcn.test_vcn.id}")
            .group(
                "filter",
                RepresentationGroup::required(
                    RepresentationMap::new()
                        .required("name", "id")
                        .required(
                            "values",
                            Value::list(["${oci_core_route_table.test_route_table.id}"]),
                        ),
                ),
            )
    })
}

/// VCN and the internet gateway the route rules point at
pub fn route_table_resource_dependencies() -> String {
    let mut config = core_vcn::vcn_required_only_resource();
    config.push_str(&core_internet_gateway::internet_gateway_resource(
        RepType::Required,
        RepresentationMode::Create,
    ));
    config
}

pub fn route_table_resource(rep_type: RepType, mode: RepresentationMode) -> String {
    generate_resource_from_representation_map(
        RESOURCE_TYPE,
        RESOURCE_NAME,
        rep_type,
        mode,
        route_table_representation(),
    )
}

pub fn route_table_data_source_config(mode: RepresentationMode) -> String {
    generate_data_source_from_representation_map(
        "oci_core_route_tables",
        "test_route_tables",
        RepType::Optional,
        mode,
        route_table_data_source_representation(),
    )
}

pub struct CoreRouteTable {
    client: Client,
}

impl CoreRouteTable {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DestroyTarget for CoreRouteTable {
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
        Ok(Some(self.client.route_tables().get(&instance.id).await?.lifecycle_state))
    }
}

#[async_trait]
impl SweepTarget for CoreRouteTable {
    type Error = ApiError;

    fn name(&self) -> &str {
        SWEEPER_NAME
    }

    fn id_kind(&self) -> &str {
        "RouteTableId"
    }

    /// Lists VCNs first so every default route table is protected before
    /// this sweeper runs, which is ahead of the VCN sweeper
    async fn list_ids(
        &self,
        compartment_id: &str,
        ctx: &SweepContext,
    ) -> Result<Vec<String>, ApiError> {
        core_vcn::list_vcns_protecting_defaults(&self.client, compartment_id, ctx).await?;
        let tables = self
            .client
            .route_tables()
            .list(compartment_id, None, Some("AVAILABLE"))
            .await?;
        Ok(tables.into_iter().map(|t| t.id).collect())
    }

    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client.route_tables().delete(id).await
    }

    async fn lifecycle_state(&self, id: &str) -> Result<Option<String>, ApiError> {
        Ok(Some(self.client.route_tables().get(id).await?.lifecycle_state))
    }

    fn is_pending(&self, lifecycle_state: &str) -> bool {
        lifecycle_state != "TERMINATED"
    }
}

/// Route tables go before their VCN and before the gateways their rules target
pub fn register(registry: &mut SweeperRegistry, clients: &OracleClients) {
    registry.add_dependency("vcn", SWEEPER_NAME);
    registry.add_dependency("internet_gateway", SWEEPER_NAME);
    registry.add_sweeper(SWEEPER_NAME, "route_table", CoreRouteTable::new(clients.core.clone()));
}
