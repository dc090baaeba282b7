//! Acceptance test configuration read from the environment

use crate::error::{AcctestError, Result};
use std::path::PathBuf;

pub const TF_ACC: &str = "TF_ACC";
pub const COMPARTMENT_OCID: &str = "TF_VAR_compartment_ocid";
pub const COMPARTMENT_ID_FOR_UPDATE: &str = "TF_VAR_compartment_id_for_update";
pub const REGION: &str = "TF_VAR_region";
pub const TENANCY_OCID: &str = "TF_VAR_tenancy_ocid";
pub const SAVE_CONFIG_CONTENT: &str = "save_config_content";
pub const CONFIG_DUMP_DIR: &str = "TF_ACC_CONFIG_DUMP_DIR";
pub const SWEEP_EXCLUDE_LIST: &str = "sweep_exclude_list";

const DEFAULT_CONFIG_DUMP_DIR: &str = "tf_config_dump";

#[derive(Debug, Clone, Default)]
pub struct TestConfig {
    pub compartment_id: Option<String>,
    pub compartment_id_for_update: Option<String>,
    pub region: Option<String>,
    pub tenancy_id: Option<String>,
    pub save_config: bool,
    pub config_dump_dir: PathBuf,
    pub sweep_exclude_list: Vec<String>,
}

impl TestConfig {
    pub fn from_env() -> Self {
        let non_empty = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        Self {
            compartment_id: non_empty(COMPARTMENT_OCID),
            compartment_id_for_update: non_empty(COMPARTMENT_ID_FOR_UPDATE),
            region: non_empty(REGION),
            tenancy_id: non_empty(TENANCY_OCID),
            save_config: non_empty(SAVE_CONFIG_CONTENT)
                .and_then(|v| v.parse::<bool>().ok())
                .unwrap_or(false),
            config_dump_dir: non_empty(CONFIG_DUMP_DIR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_DUMP_DIR)),
            sweep_exclude_list: non_empty(SWEEP_EXCLUDE_LIST)
                .map(|v| {
                    v.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
        }
    }

    /// Fails naming the first missing variable an acceptance run needs
    pub fn pre_check(&self) -> Result<()> {
        if self.compartment_id.is_none() {
            return Err(AcctestError::InvalidConfiguration(format!(
                "{} must be set for acceptance tests",
                COMPARTMENT_OCID
            )));
        }
        if self.region.is_none() {
            return Err(AcctestError::InvalidConfiguration(format!(
                "{} must be set for acceptance tests",
                REGION
            )));
        }
        Ok(())
    }

    pub fn compartment_id(&self) -> Result<&str> {
        self.compartment_id.as_deref().ok_or_else(|| {
            AcctestError::InvalidConfiguration(format!("{} is required", COMPARTMENT_OCID))
        })
    }

    pub fn in_sweeper_exclude_list(&self, name: &str) -> bool {
        self.sweep_exclude_list.iter().any(|s| s == name)
    }
}

/// Acceptance tests only run against real infrastructure when `TF_ACC` is set
pub fn acceptance_enabled() -> bool {
    std::env::var(TF_ACC)
        .map(|v| !v.is_empty() && v != "0")
        .unwrap_or(false)
}

/// Random lowercase alphanumeric suffix for resource names
pub fn random_string(len: usize) -> String {
    uuid::Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(len)
        .collect()
}
