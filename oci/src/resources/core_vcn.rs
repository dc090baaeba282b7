//! `oci_core_vcn`: representations, destroy check and sweeper

use crate::api::core::vcn::Vcn;
use crate::api::{ApiError, Client, OracleClients};
use acctest::{
    generate_data_source_from_representation_map, generate_resource_from_representation_map,
    DestroyTarget, InstanceState, RepType, RepresentationGroup, RepresentationMap,
    RepresentationMode, SweepContext, SweepTarget, SweeperRegistry, Value,
};
use async_trait::async_trait;
use std::sync::OnceLock;

pub const RESOURCE_TYPE: &str = "oci_core_vcn";
pub const RESOURCE_NAME: &str = "test_vcn";
pub const SWEEPER_NAME: &str = "CoreVcn";
pub const VCN_ID_KIND: &str = "VcnId";

pub fn vcn_representation() -> &'static RepresentationMap {
    static REP: OnceLock<RepresentationMap> = OnceLock::new();
    REP.get_or_init(|| {
        RepresentationMap::new()
            .required("cidr_block", "10.0.0.0/16")
            .required("compartment_id", "${var.compartment_id}")
            .optional_with_update("display_name", "displayName", "displayName2")
            .optional("dns_label", "dnslabel")
            .optional_with_update(
                "freeform_tags",
                Value::map([("Department", "Finance")]),
                Value::map([("Department", "Accounting")]),
            )
    })
}

pub fn vcn_data_source_representation() -> &'static RepresentationMap {
    static REP: OnceLock<RepresentationMap> = OnceLock::new();
    REP.get_or_init(|| {
        RepresentationMap::new()
            .required("compartment_id", "${var.compartment_id}")
            .optional_with_update("display_name", "displayName", "displayName2")
            .optional("state", "AVAILABLE")
            .group(
                "filter",
                RepresentationGroup::required(vcn_data_source_filter_representation().clone()),
            )
    })
}

pub fn vcn_data_source_filter_representation() -> &'static RepresentationMap {
    static REP: OnceLock<RepresentationMap> = OnceLock::new();
    REP.get_or_init(|| {
        RepresentationMap::new()
            .required("name", "id")
            .required("values", Value::list(["${oci_core_vcn.test_vcn.id}"]))
    })
}

/// The VCN other core resources hang off, with only its required fields
pub fn vcn_required_only_resource() -> String {
    generate_resource_from_representation_map(
        RESOURCE_TYPE,
        RESOURCE_NAME,
        RepType::Required,
        RepresentationMode::Create,
        vcn_representation(),
    )
}

/// Full VCN in its update variant
pub fn vcn_resource_config() -> String {
    generate_resource_from_representation_map(
        RESOURCE_TYPE,
        RESOURCE_NAME,
        RepType::Optional,
        RepresentationMode::Update,
        vcn_representation(),
    )
}

/// `data "oci_core_vcns" "test_vcns"` in the given variant
pub fn vcn_data_source_config(mode: RepresentationMode) -> String {
    generate_data_source_from_representation_map(
        "oci_core_vcns",
        "test_vcns",
        RepType::Optional,
        mode,
        vcn_data_source_representation(),
    )
}

/// Lists available VCNs, marks their default route table, security list
/// and DHCP options as protected so no sweeper deletes them, and records the
/// VCN ids so the VCN sweeper reuses this listing
pub async fn list_vcns_protecting_defaults(
    client: &Client,
    compartment_id: &str,
    ctx: &SweepContext,
) -> Result<Vec<Vcn>, ApiError> {
    let vcns = client.vcns().list(compartment_id, Some("AVAILABLE")).await?;
    for vcn in &vcns {
        for id in vcn.default_resource_ids() {
            ctx.protect(id).await;
        }
        ctx.add_resource_id(compartment_id, VCN_ID_KIND, &vcn.id).await;
    }
    Ok(vcns)
}

pub struct CoreVcn {
    client: Client,
}

impl CoreVcn {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DestroyTarget for CoreVcn {
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
        let vcn = self.client.vcns().get(&instance.id).await?;
        Ok(Some(vcn.lifecycle_state))
    }
}

#[async_trait]
impl SweepTarget for CoreVcn {
    type Error = ApiError;

    fn name(&self) -> &str {
        SWEEPER_NAME
    }

    fn id_kind(&self) -> &str {
        VCN_ID_KIND
    }

    async fn list_ids(
        &self,
        compartment_id: &str,
        ctx: &SweepContext,
    ) -> Result<Vec<String>, ApiError> {
        let vcns = list_vcns_protecting_defaults(&self.client, compartment_id, ctx).await?;
        Ok(vcns.into_iter().map(|v| v.id).collect())
    }

    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client.vcns().delete(id).await
    }

    async fn lifecycle_state(&self, id: &str) -> Result<Option<String>, ApiError> {
        Ok(Some(self.client.vcns().get(id).await?.lifecycle_state))
    }

    fn is_pending(&self, lifecycle_state: &str) -> bool {
        lifecycle_state != "TERMINATED"
    }
}

pub fn register(registry: &mut SweeperRegistry, clients: &OracleClients) {
    registry.add_sweeper(SWEEPER_NAME, "vcn", CoreVcn::new(clients.core.clone()));
}
