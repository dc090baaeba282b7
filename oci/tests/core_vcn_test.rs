//! Lifecycle test for `oci_core_vcn`. Runs only with `TF_ACC` set.

#![allow(clippy::disallowed_methods)] // Allow unwrap() in tests for clarity

use acctest::{
    check_resource_attr, check_resource_attr_set, compose_aggregate,
    generate_resource_from_representation_map, init_test_logging, ImportStep, RepType,
    Representation, RepresentationMode, ResourceIdTracker, TestCase, TestStep,
};
use oci::resources::core_vcn::{
    vcn_data_source_config, vcn_required_only_resource, vcn_representation, CoreVcn,
    RESOURCE_TYPE,
};

const ADDRESS: &str = "oci_core_vcn.test_vcn";
const DATA_ADDRESS: &str = "data.oci_core_vcns.test_vcns";

#[tokio::test]
async fn test_core_vcn_resource_basic() {
    init_test_logging();
    let Some(ctx) = oci::setup().unwrap() else {
        return;
    };

    let compartment_id = ctx.compartment_id().unwrap().to_string();
    let common = format!(
        "{}{}",
        ctx.provider_config(),
        ctx.compartment_id_variable_str().unwrap()
    );

    let create = generate_resource_from_representation_map(
        RESOURCE_TYPE,
        "test_vcn",
        RepType::Optional,
        RepresentationMode::Create,
        vcn_representation(),
    );
    let update = generate_resource_from_representation_map(
        RESOURCE_TYPE,
        "test_vcn",
        RepType::Optional,
        RepresentationMode::Update,
        vcn_representation(),
    );
    ctx.save_config(&format!("{}{}", common, create), "core", "vcn", "test_core_vcn_resource_basic")
        .unwrap();

    let tracker = ResourceIdTracker::new();
    let mut steps = vec![
        // required fields only
        TestStep::apply(format!("{}{}", common, vcn_required_only_resource())).with_check(
            compose_aggregate(vec![
                check_resource_attr(ADDRESS, "cidr_block", "10.0.0.0/16"),
                check_resource_attr(ADDRESS, "compartment_id", &compartment_id),
            ]),
        ),
        // delete before the optional create
        TestStep::apply(common.clone()),
        TestStep::apply(format!("{}{}", common, create)).with_check(compose_aggregate(vec![
            check_resource_attr(ADDRESS, "display_name", "displayName"),
            check_resource_attr(ADDRESS, "dns_label", "dnslabel"),
            check_resource_attr(ADDRESS, "freeform_tags.%", "1"),
            check_resource_attr_set(ADDRESS, "default_route_table_id"),
            check_resource_attr(ADDRESS, "state", "AVAILABLE"),
            tracker.capture(ADDRESS),
        ])),
    ];

    if let Some(compartment_u) = ctx.compartment_id_u_variable_str() {
        let moved = generate_resource_from_representation_map(
            RESOURCE_TYPE,
            "test_vcn",
            RepType::Optional,
            RepresentationMode::Create,
            &vcn_representation().updated(
                "compartment_id",
                Representation::required("${var.compartment_id_for_update}"),
            ),
        );
        let expected = ctx.config.compartment_id_for_update.clone().unwrap_or_default();
        steps.push(
            TestStep::apply(format!("{}{}{}", common, compartment_u, moved)).with_check(
                compose_aggregate(vec![
                    check_resource_attr(ADDRESS, "compartment_id", &expected),
                    tracker.expect_unchanged(ADDRESS),
                ]),
            ),
        );
    }

    steps.extend([
        TestStep::apply(format!("{}{}", common, update)).with_check(compose_aggregate(vec![
            check_resource_attr(ADDRESS, "display_name", "displayName2"),
            check_resource_attr(ADDRESS, "freeform_tags.Department", "Accounting"),
            tracker.expect_unchanged(ADDRESS),
        ])),
        TestStep::apply(format!(
            "{}{}{}",
            common,
            update,
            vcn_data_source_config(RepresentationMode::Update)
        ))
        .with_check(compose_aggregate(vec![
            check_resource_attr(DATA_ADDRESS, "compartment_id", &compartment_id),
            check_resource_attr(DATA_ADDRESS, "display_name", "displayName2"),
            check_resource_attr(DATA_ADDRESS, "virtual_networks.#", "1"),
            check_resource_attr(DATA_ADDRESS, "virtual_networks.0.cidr_block", "10.0.0.0/16"),
        ])),
        TestStep::import(format!("{}{}", common, update), ImportStep::new(ADDRESS)),
    ]);

    let case = TestCase::new(steps).with_destroy_check(CoreVcn::new(ctx.clients.core.clone()));
    ctx.run("test_core_vcn_resource_basic", case).await.unwrap();
}
