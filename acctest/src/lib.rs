//! acctest - acceptance test kit for Terraform providers
//!
//! Resources are described declaratively as representation maps, rendered
//! to configuration text, applied through a [`Harness`] and asserted on via
//! the flat state projection. Destroy checks and sweepers confirm that
//! nothing is left behind in the cloud account.

// Core modules
pub mod config;
pub mod error;
pub mod representation;
pub mod state;

// Rendering and assertions
pub mod check;
pub mod render;

// Test execution
pub mod driver;
pub mod harness;

// Cleanup
pub mod destroy;
pub mod sweep;

// Re-exports for convenience
pub use check::{
    check_no_resource_attr, check_resource_attr, check_resource_attr_pair,
    check_resource_attr_set, check_set_contains_element_with_properties, compose,
    compose_aggregate, Check, ResourceIdTracker,
};
pub use config::{acceptance_enabled, random_string, TestConfig};
pub use destroy::{check_destroyed, CheckDestroy, DestroyTarget};
pub use driver::{run_test_case, save_config_content, ImportStep, TestCase, TestStep};
pub use error::{AcctestError, Result, ServiceFailure};
pub use harness::{Harness, TerraformCli};
pub use render::{
    generate_data_source_from_representation_map, generate_resource_from_representation_map,
    variable_str,
};
pub use representation::{
    Field, RepType, Representation, RepresentationGroup, RepresentationMap, RepresentationMode,
    Value,
};
pub use state::{from_instance_state, InstanceState, State};
pub use sweep::{
    sweep_resource, wait_till_condition, Sweep, SweepContext, SweepReport, SweepSettings,
    SweepTarget, SweeperRegistry,
};

/// Installs a test-friendly `tracing` subscriber once per process
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}
