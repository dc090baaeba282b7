//! `oci_core_internet_gateway`: representations, destroy check and sweeper

use super::core_vcn;
use crate::api::{ApiError, Client, OracleClients};
use acctest::{
    generate_data_source_from_representation_map, generate_resource_from_representation_map,
    DestroyTarget, InstanceState, RepType, RepresentationGroup, RepresentationMap,
    RepresentationMode, SweepContext, SweepTarget, SweeperRegistry, Value,
};
use async_trait::async_trait;
use std::sync::OnceLock;

pub const RESOURCE_TYPE: &str = "oci_core_internet_gateway";
pub const RESOURCE_NAME: &str = "test_internet_gateway";
pub const SWEEPER_NAME: &str = "CoreInternetGateway";

pub fn internet_gateway_representation() -> &'static RepresentationMap {
    static REP: OnceLock<RepresentationMap> = OnceLock::new();
    REP.get_or_init(|| {
        RepresentationMap::new()
            .required("compartment_id", "${var.compartment_id}")
            .required("vcn_id", "${oci_core_vcn.test_vcn.id}")
            .optional_with_update("display_name", "MyInternetGateway", "displayName2")
            .optional_with_update("enabled", false, true)
            .optional_with_update(
                "freeform_tags",
                Value::map([("Department", "Finance")]),
                Value::map([("Department", "Accounting")]),
            )
    })
}

pub fn internet_gateway_data_source_representation() -> &'static RepresentationMap {
    static REP: OnceLock<RepresentationMap> = OnceLock::new();
    REP.get_or_init(|| {
        RepresentationMap::new()
            .required("compartment_id", "${var.compartment_id}")
            .required("vcn_id", "${oci_core_vcn.test_vcn.id}")
            .optional_with_update("display_name", "MyInternetGateway", "displayName2")
            .optional("state", "AVAILABLE")
            .group(
                "filter",
                RepresentationGroup::required(
                    RepresentationMap::new()
                        .required("name", "id")
                        .required(
                            "values",
                            Value::list(["${oci_core_internet_gateway.test_internet_gateway.id}"]),
                        ),
                ),
            )
    })
}

pub fn internet_gateway_resource_dependencies() -> String {
    core_vcn::vcn_required_only_resource()
}

pub fn internet_gateway_resource(rep_type: RepType, mode: RepresentationMode) -> String {
    generate_resource_from_representation_map(
        RESOURCE_TYPE,
        RESOURCE_NAME,
        rep_type,
        mode,
        internet_gateway_representation(),
    )
}

pub fn internet_gateway_data_source_config(mode: RepresentationMode) -> String {
    generate_data_source_from_representation_map(
        "oci_core_internet_gateways",
        "test_internet_gateways",
        RepType::Optional,
        mode,
        internet_gateway_data_source_representation(),
    )
}

pub struct CoreInternetGateway {
    client: Client,
}

impl CoreInternetGateway {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DestroyTarget for CoreInternetGateway {
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
        let gateway = self.client.internet_gateways().get(&instance.id).await?;
        Ok(Some(gateway.lifecycle_state))
    }
}

#[async_trait]
impl SweepTarget for CoreInternetGateway {
    type Error = ApiError;

    fn name(&self) -> &str {
        SWEEPER_NAME
    }

    fn id_kind(&self) -> &str {
        "InternetGatewayId"
    }

    async fn list_ids(
        &self,
        compartment_id: &str,
        _ctx: &SweepContext,
    ) -> Result<Vec<String>, ApiError> {
        let gateways = self
            .client
            .internet_gateways()
            .list(compartment_id, None, Some("AVAILABLE"))
            .await?;
        Ok(gateways.into_iter().map(|g| g.id).collect())
    }

    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client.internet_gateways().delete(id).await
    }

    async fn lifecycle_state(&self, id: &str) -> Result<Option<String>, ApiError> {
        Ok(Some(self.client.internet_gateways().get(id).await?.lifecycle_state))
    }

    fn is_pending(&self, lifecycle_state: &str) -> bool {
        lifecycle_state != "TERMINATED"
    }
}

pub fn register(registry: &mut SweeperRegistry, clients: &OracleClients) {
    registry.add_dependency("vcn", SWEEPER_NAME);
    registry.add_sweeper(
        SWEEPER_NAME,
        "internet_gateway",
        CoreInternetGateway::new(clients.core.clone()),
    );
}
