//! Per-resource acceptance definitions
//!
//! Each module holds the representation tables for one resource type, the
//! config fragments its tests depend on, and the destroy check and sweeper
//! for that type.

pub mod core_internet_gateway;
pub mod core_route_table;
pub mod core_subnet;
pub mod core_vcn;
pub mod database_autonomous_database;
pub mod object_storage_bucket;

use crate::api::OracleClients;
use acctest::SweeperRegistry;

/// Registers every sweeper together with its dependency edges
pub fn register_sweepers(registry: &mut SweeperRegistry, clients: &OracleClients) {
    core_vcn::register(registry, clients);
    core_subnet::register(registry, clients);
    core_internet_gateway::register(registry, clients);
    core_route_table::register(registry, clients);
    database_autonomous_database::register(registry, clients);
    object_storage_bucket::register(registry, clients);
}
