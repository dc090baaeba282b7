//! `oci_core_subnet`: representations, destroy check and sweeper

use super::core_vcn;
use crate::api::{ApiError, Client, OracleClients};
use acctest::{
    generate_data_source_from_representation_map, generate_resource_from_representation_map,
    DestroyTarget, InstanceState, RepType, Representation, RepresentationGroup,
    RepresentationMap, RepresentationMode, SweepContext, SweepTarget, SweeperRegistry, Value,
};
use async_trait::async_trait;
use std::sync::OnceLock;

pub const RESOURCE_TYPE: &str = "oci_core_subnet";
pub const RESOURCE_NAME: &str = "test_subnet";
pub const SWEEPER_NAME: &str = "CoreSubnet";

pub fn subnet_representation() -> &'static RepresentationMap {
    static REP: OnceLock<RepresentationMap> = OnceLock::new();
    REP.get_or_init(|| {
        RepresentationMap::new()
            .required("cidr_block", "10.0.0.0/24")
            .required("compartment_id", "${var.compartment_id}")
            .required("vcn_id", "${oci_core_vcn.test_vcn.id}")
            .optional_with_update("display_name", "MySubnet", "displayName2")
            .optional("dns_label", "dnslabel")
            .optional_with_update(
                "freeform_tags",
                Value::map([("Department", "Finance")]),
                Value::map([("Department", "Accounting")]),
            )
            .optional("prohibit_public_ip_on_vnic", false)
            .optional("route_table_id", "${oci_core_vcn.test_vcn.default_route_table_id}")
            .optional(
                "security_list_ids",
                Value::list(["${oci_core_vcn.test_vcn.default_security_list_id}"]),
            )
    })
}

pub fn subnet_data_source_representation() -> &'static RepresentationMap {
    static REP: OnceLock<RepresentationMap> = OnceLock::new();
    REP.get_or_init(|| {
        RepresentationMap::new()
            .required("compartment_id", "${var.compartment_id}")
            .optional_with_update("display_name", "MySubnet", "displayName2")
            .optional("state", "AVAILABLE")
            .optional("vcn_id", "${oci_core_vcn.test_vcn.id}")
            .group(
                "filter",
                RepresentationGroup::required(
                    RepresentationMap::new()
                        .required("name", "id")
                        .required("values", Value::list(["${oci_core_subnet.test_subnet.id}"])),
                ),
            )
    })
}

/// A VCN with a DNS label, which subnets with their own label require
pub fn subnet_resource_dependencies() -> String {
    generate_resource_from_representation_map(
        core_vcn::RESOURCE_TYPE,
        core_vcn::RESOURCE_NAME,
        RepType::Required,
        RepresentationMode::Create,
        &core_vcn::vcn_representation()
            .updated("dns_label", Representation::required("dnslabel")),
    )
}

pub fn subnet_resource(rep_type: RepType, mode: RepresentationMode) -> String {
    generate_resource_from_representation_map(
        RESOURCE_TYPE,
        RESOURCE_NAME,
        rep_type,
        mode,
        subnet_representation(),
    )
}

pub fn subnet_data_source_config(mode: RepresentationMode) -> String {
    generate_data_source_from_representation_map(
        "oci_core_subnets",
        "test_subnets",
        RepType::Optional,
        mode,
        subnet_data_source_representation(),
    )
}

pub struct CoreSubnet {
    client: Client,
}

impl CoreSubnet {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DestroyTarget for CoreSubnet {
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
        Ok(Some(self.client.subnets().get(&instance.id).await?.lifecycle_state))
    }
}

#[async_trait]
impl SweepTarget for CoreSubnet {
    type Error = ApiError;

    fn name(&self) -> &str {
        SWEEPER_NAME
    }

    fn id_kind(&self) -> &str {
        "SubnetId"
    }

    async fn list_ids(
        &self,
        compartment_id: &str,
        _ctx: &SweepContext,
    ) -> Result<Vec<String>, ApiError> {
        let subnets = self
            .client
            .subnets()
            .list(compartment_id, None, Some("AVAILABLE"))
            .await?;
        Ok(subnets.into_iter().map(|s| s.id).collect())
    }

    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client.subnets().delete(id).await
    }

    async fn lifecycle_state(&self, id: &str) -> Result<Option<String>, ApiError> {
        Ok(Some(self.client.subnets().get(id).await?.lifecycle_state))
    }

    fn is_pending(&self, lifecycle_state: &str) -> bool {
        lifecycle_state != "TERMINATED"
    }
}

/// Subnets go before the VCN they live in and before any route table they use
pub fn register(registry: &mut SweeperRegistry, clients: &OracleClients) {
    registry.add_dependency("vcn", SWEEPER_NAME);
    registry.add_dependency("route_table", SWEEPER_NAME);
    registry.add_sweeper(SWEEPER_NAME, "subnet", CoreSubnet::new(clients.core.clone()));
}
