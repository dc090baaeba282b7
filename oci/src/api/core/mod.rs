//! Core networking service (`iaas` endpoint)

pub mod internet_gateway;
pub mod route_table;
pub mod subnet;
pub mod vcn;

use crate::api::Client;

impl Client {
    pub fn vcns(&self) -> vcn::VcnsApi<'_> {
        vcn::VcnsApi::new(self)
    }

    pub fn subnets(&self) -> subnet::SubnetsApi<'_> {
        subnet::SubnetsApi::new(self)
    }

    pub fn internet_gateways(&self) -> internet_gateway::InternetGatewaysApi<'_> {
        internet_gateway::InternetGatewaysApi::new(self)
    }

    pub fn route_tables(&self) -> route_table::RouteTablesApi<'_> {
        route_table::RouteTablesApi::new(self)
    }
}
