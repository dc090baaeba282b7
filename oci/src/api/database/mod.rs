//! Database service (`database` endpoint)

pub mod autonomous_database;

use crate::api::Client;

impl Client {
    pub fn autonomous_databases(&self) -> autonomous_database::AutonomousDatabasesApi<'_> {
        autonomous_database::AutonomousDatabasesApi::new(self)
    }
}
