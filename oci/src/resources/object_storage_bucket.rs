//! `oci_objectstorage_bucket`: representations, destroy check and sweeper
//!
//! Buckets have no OCID-based address and no lifecycle state. They are
//! imported and swept by the composite id `n/{namespace}/b/{bucket}`, and
//! count as destroyed only once a lookup returns 404.

use crate::api::object_storage::bucket::{bucket_composite_id, parse_bucket_composite_id};
use crate::api::{ApiError, Client, OracleClients};
use acctest::{
    from_instance_state, generate_data_source_from_representation_map,
    generate_resource_from_representation_map, random_string, DestroyTarget, InstanceState,
    RepType, RepresentationGroup, RepresentationMap, RepresentationMode, State, SweepContext,
    SweepTarget, SweeperRegistry, Value,
};
use async_trait::async_trait;
use std::sync::OnceLock;

pub const RESOURCE_TYPE: &str = "oci_objectstorage_bucket";
pub const RESOURCE_NAME: &str = "test_bucket";
pub const SWEEPER_NAME: &str = "ObjectStorageBucket";

pub fn bucket_name() -> &'static str {
    static NAME: OnceLock<String> = OnceLock::new();
    NAME.get_or_init(|| format!("bucket-{}", random_string(16)))
}

pub fn bucket_representation() -> &'static RepresentationMap {
    static REP: OnceLock<RepresentationMap> = OnceLock::new();
    REP.get_or_init(|| {
        RepresentationMap::new()
            .required("compartment_id", "${var.compartment_id}")
            .required("name", bucket_name())
            .required("namespace", "${data.oci_objectstorage_namespace.t.namespace}")
            .optional_with_update("access_type", "NoPublicAccess", "ObjectRead")
            .optional_with_update(
                "freeform_tags",
                Value::map([("Department", "Finance")]),
                Value::map([("Department", "Accounting")]),
            )
            .optional_with_update(
                "metadata",
                Value::map([("content-type", "text/plain")]),
                Value::map([("content-type", "text/xml")]),
            )
            .optional("storage_tier", "Standard")
    })
}

pub fn bucket_data_source_representation() -> &'static RepresentationMap {
    static REP: OnceLock<RepresentationMap> = OnceLock::new();
    REP.get_or_init(|| {
        RepresentationMap::new()
            .required("compartment_id", "${var.compartment_id}")
            .required("namespace", "${data.oci_objectstorage_namespace.t.namespace}")
            .group(
                "filter",
                RepresentationGroup::required(
                    RepresentationMap::new()
                        .required("name", "name")
                        .required(
                            "values",
                            Value::list(["${oci_objectstorage_bucket.test_bucket.name}"]),
                        ),
                ),
            )
    })
}

/// The namespace data source every bucket config reads its namespace from
pub fn bucket_resource_dependencies() -> String {
    generate_data_source_from_representation_map(
        "oci_objectstorage_namespace",
        "t",
        RepType::Optional,
        RepresentationMode::Create,
        &RepresentationMap::new().optional("compartment_id", "${var.compartment_id}"),
    )
}

pub fn bucket_resource(rep_type: RepType, mode: RepresentationMode) -> String {
    generate_resource_from_representation_map(
        RESOURCE_TYPE,
        RESOURCE_NAME,
        rep_type,
        mode,
        bucket_representation(),
    )
}

pub fn bucket_data_source_config(mode: RepresentationMode) -> String {
    generate_data_source_from_representation_map(
        "oci_objectstorage_bucket_summaries",
        "test_buckets",
        RepType::Optional,
        mode,
        bucket_data_source_representation(),
    )
}

/// Import id of the bucket tracked at `address`
pub fn bucket_import_id(state: &State, address: &str) -> acctest::Result<String> {
    let namespace = from_instance_state(state, address, "namespace")?;
    let name = from_instance_state(state, address, "name")?;
    Ok(bucket_composite_id(&namespace, &name))
}

fn namespace_and_name(instance: &InstanceState) -> Result<(String, String), ApiError> {
    match (instance.attribute("namespace"), instance.attribute("name")) {
        (Some(namespace), Some(name)) => Ok((namespace.to_string(), name.to_string())),
        _ => parse_bucket_composite_id(&instance.id)
            .ok_or_else(|| ApiError::InvalidId(instance.id.clone())),
    }
}

pub struct ObjectStorageBucket {
    client: Client,
}

impl ObjectStorageBucket {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DestroyTarget for ObjectStorageBucket {
    type Error = ApiError;

    fn resource_type(&self) -> &str {
        RESOURCE_TYPE
    }

    fn deleted_states(&self) -> &[&str] {
        &[]
    }

    async fn fetch_lifecycle_state(
        &self,
        instance: &InstanceState,
    ) -> Result<Option<String>, ApiError> {
        let (namespace, name) = namespace_and_name(instance)?;
        self.client.buckets().get(&namespace, &name).await?;
        Ok(None)
    }
}

#[async_trait]
impl SweepTarget for ObjectStorageBucket {
    type Error = ApiError;

    fn name(&self) -> &str {
        SWEEPER_NAME
    }

    fn id_kind(&self) -> &str {
        "BucketId"
    }

    async fn list_ids(
        &self,
        compartment_id: &str,
        _ctx: &SweepContext,
    ) -> Result<Vec<String>, ApiError> {
        let buckets = self.client.buckets();
        let namespace = buckets.namespace().await?;
        let summaries = buckets.list(&namespace, compartment_id).await?;
        Ok(summaries
            .iter()
            .map(|b| bucket_composite_id(&b.namespace, &b.name))
            .collect())
    }

    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let (namespace, name) =
            parse_bucket_composite_id(id).ok_or_else(|| ApiError::InvalidId(id.to_string()))?;
        self.client.buckets().delete(&namespace, &name).await
    }

    async fn lifecycle_state(&self, id: &str) -> Result<Option<String>, ApiError> {
        let (namespace, name) =
            parse_bucket_composite_id(id).ok_or_else(|| ApiError::InvalidId(id.to_string()))?;
        self.client.buckets().get(&namespace, &name).await?;
        Ok(None)
    }

    fn is_pending(&self, _lifecycle_state: &str) -> bool {
        false
    }
}

pub fn register(registry: &mut SweeperRegistry, clients: &OracleClients) {
    registry.add_sweeper(
        SWEEPER_NAME,
        "bucket",
        ObjectStorageBucket::new(clients.object_storage.clone()),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dependencies_declare_namespace_data_source() {
        assert_eq!(
            bucket_resource_dependencies(),
            "\ndata \"oci_objectstorage_namespace\" \"t\" {\n\tcompartment_id = \"${var.compartment_id}\"\n}\n"
        );
    }

    #[test]
    fn import_id_is_composite() {
        let mut state = State::new();
        state.insert_resource(
            RESOURCE_TYPE,
            RESOURCE_NAME,
            InstanceState::new("mytenancy/bucket-x")
                .with_attribute("namespace", "mytenancy")
                .with_attribute("name", "bucket-x"),
        );
        assert_eq!(
            bucket_import_id(&state, "oci_objectstorage_bucket.test_bucket").unwrap(),
            "n/mytenancy/b/bucket-x"
        );
    }

    #[test]
    fn instance_without_attributes_falls_back_to_composite_id() {
        let instance = InstanceState::new("n/mytenancy/b/bucket-x");
        assert_eq!(
            namespace_and_name(&instance).unwrap(),
            ("mytenancy".to_string(), "bucket-x".to_string())
        );
        assert!(namespace_and_name(&InstanceState::new("bogus")).is_err());
    }
}
