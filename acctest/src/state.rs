//! Flat state projection
//!
//! Assertions and id lookups work on the same view the Terraform SDK
//! exposes to Go providers: every resource instance has a flat map of
//! dotted attribute keys (`route_rules.0.destination`) to string values,
//! with `#` holding list lengths and `%` holding map sizes.

use crate::error::{AcctestError, Result};
use crate::render::format_number;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceMode {
    Managed,
    Data,
}

/// The primary instance of a resource
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstanceState {
    pub id: String,
    pub attributes: BTreeMap<String, String>,
}

impl InstanceState {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        let mut attributes = BTreeMap::new();
        attributes.insert("id".to_string(), id.clone());
        Self { id, attributes }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceState {
    pub resource_type: String,
    pub name: String,
    pub mode: ResourceMode,
    pub primary: InstanceState,
}

/// Root module state after a step, keyed by resource address
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct State {
    pub resources: BTreeMap<String, ResourceState>,
}

#[derive(Debug, Deserialize)]
struct ShowOutput {
    values: Option<ShowValues>,
}

#[derive(Debug, Deserialize)]
struct ShowValues {
    root_module: ShowModule,
}

#[derive(Debug, Default, Deserialize)]
struct ShowModule {
    #[serde(default)]
    resources: Vec<ShowResource>,
    #[serde(default)]
    child_modules: Vec<ShowModule>,
}

#[derive(Debug, Deserialize)]
struct ShowResource {
    address: String,
    mode: ResourceMode,
    #[serde(rename = "type")]
    resource_type: String,
    name: String,
    #[serde(default)]
    values: serde_json::Value,
}

impl State {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses the output of `terraform show -json`. An empty workspace
    /// (no `values` key) yields an empty state.
    pub fn from_show_json(json: &serde_json::Value) -> Result<Self> {
        let output: ShowOutput = serde_json::from_value(json.clone())?;
        let mut state = State::new();
        if let Some(values) = output.values {
            state.collect_module(values.root_module);
        }
        Ok(state)
    }

    fn collect_module(&mut self, module: ShowModule) {
        for resource in module.resources {
            let attributes = flatten_attributes(&resource.values);
            let id = attributes.get("id").cloned().unwrap_or_default();
            self.resources.insert(
                resource.address,
                ResourceState {
                    resource_type: resource.resource_type,
                    name: resource.name,
                    mode: resource.mode,
                    primary: InstanceState { id, attributes },
                },
            );
        }
        for child in module.child_modules {
            self.collect_module(child);
        }
    }

    /// Adds a managed resource at `<type>.<name>`
    pub fn insert_resource(&mut self, resource_type: &str, name: &str, primary: InstanceState) {
        self.resources.insert(
            format!("{}.{}", resource_type, name),
            ResourceState {
                resource_type: resource_type.to_string(),
                name: name.to_string(),
                mode: ResourceMode::Managed,
                primary,
            },
        );
    }

    /// Adds a data source at `data.<type>.<name>`
    pub fn insert_data_source(&mut self, data_type: &str, name: &str, primary: InstanceState) {
        self.resources.insert(
            format!("data.{}.{}", data_type, name),
            ResourceState {
                resource_type: data_type.to_string(),
                name: name.to_string(),
                mode: ResourceMode::Data,
                primary,
            },
        );
    }

    pub fn get(&self, address: &str) -> Option<&ResourceState> {
        self.resources.get(address)
    }

    /// Managed instances of the given resource type
    pub fn resources_of_type<'a>(
        &'a self,
        resource_type: &'a str,
    ) -> impl Iterator<Item = (&'a String, &'a ResourceState)> + 'a {
        self.resources.iter().filter(move |(_, rs)| {
            rs.mode == ResourceMode::Managed && rs.resource_type == resource_type
        })
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

/// Reads one attribute of a resource's primary instance
pub fn from_instance_state(state: &State, address: &str, key: &str) -> Result<String> {
    let rs = state
        .get(address)
        .ok_or_else(|| AcctestError::MissingResource(address.to_string()))?;
    rs.primary
        .attributes
        .get(key)
        .cloned()
        .ok_or_else(|| AcctestError::MissingAttribute {
            resource: address.to_string(),
            key: key.to_string(),
        })
}

/// Flattens a JSON attribute object into dotted keys
pub fn flatten_attributes(values: &serde_json::Value) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    if let serde_json::Value::Object(map) = values {
        for (key, value) in map {
            flatten_into(&mut out, key, value);
        }
    }
    out
}

fn flatten_into(out: &mut BTreeMap<String, String>, prefix: &str, value: &serde_json::Value) {
    use serde_json::Value as Json;

    match value {
        Json::Null => {}
        Json::Bool(b) => {
            out.insert(prefix.to_string(), b.to_string());
        }
        Json::Number(n) => {
            let rendered = if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(u) = n.as_u64() {
                u.to_string()
            } else {
                n.as_f64().map(format_number).unwrap_or_else(|| n.to_string())
            };
            out.insert(prefix.to_string(), rendered);
        }
        Json::String(s) => {
            out.insert(prefix.to_string(), s.clone());
        }
        Json::Array(items) => {
            out.insert(format!("{}.#", prefix), items.len().to_string());
            for (i, item) in items.iter().enumerate() {
                flatten_into(out, &format!("{}.{}", prefix, i), item);
            }
        }
        Json::Object(map) => {
            let present = map.values().filter(|v| !v.is_null()).count();
            out.insert(format!("{}.%", prefix), present.to_string());
            for (key, item) in map {
                flatten_into(out, &format!("{}.{}", prefix, key), item);
            }
        }
    }
}
