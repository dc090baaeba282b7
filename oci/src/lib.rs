//! Acceptance tests and sweepers for the OCI Terraform provider
//!
//! `api` is a small REST client for the services under test, `resources`
//! holds the per-resource representations, destroy checks and sweepers, and
//! `acceptance` wires them into terraform runs.

pub mod acceptance;
pub mod api;
pub mod resources;

pub use acceptance::{setup, AcceptanceContext};
pub use api::{ApiError, Client, OracleClients, RetryPolicy};
pub use resources::register_sweepers;
