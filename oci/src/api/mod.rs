//! Minimal OCI REST client covering the services the suite exercises

pub mod client;
pub mod clients;
pub mod common;
pub mod core;
pub mod database;
pub mod error;
pub mod object_storage;

#[cfg(test)]
mod test_helpers;

pub use client::{Client, RetryPolicy};
pub use clients::OracleClients;
pub use common::{ApiQueryParams, OciApiResource};
pub use error::ApiError;
