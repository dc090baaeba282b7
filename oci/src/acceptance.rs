//! Shared glue for the acceptance tests: provider block, compartment
//! variables and running a case through terraform

use crate::api::OracleClients;
use acctest::{
    acceptance_enabled, run_test_case, save_config_content, variable_str, AcctestError, Result,
    TerraformCli, TestCase, TestConfig,
};

/// Everything an acceptance test needs once `TF_ACC` is set
pub struct AcceptanceContext {
    pub config: TestConfig,
    pub clients: OracleClients,
}

/// Returns `None` when acceptance tests are disabled, so callers can skip
/// without touching the environment any further
pub fn setup() -> Result<Option<AcceptanceContext>> {
    if !acceptance_enabled() {
        tracing::info!("{} is not set, skipping acceptance test", acctest::config::TF_ACC);
        return Ok(None);
    }

    let config = TestConfig::from_env();
    config.pre_check()?;
    let clients = OracleClients::from_config(&config)
        .map_err(|e| AcctestError::InvalidConfiguration(e.to_string()))?;
    Ok(Some(AcceptanceContext { config, clients }))
}

impl AcceptanceContext {
    /// Provider block and the variables it reads
    pub fn provider_config(&self) -> String {
        provider_test_config(&self.config)
    }

    pub fn compartment_id(&self) -> Result<&str> {
        self.config.compartment_id()
    }

    /// `variable "compartment_id"`
    pub fn compartment_id_variable_str(&self) -> Result<String> {
        Ok(variable_str("compartment_id", self.compartment_id()?))
    }

    /// `variable "compartment_id_for_update"`, when a second compartment is configured
    pub fn compartment_id_u_variable_str(&self) -> Option<String> {
        self.config
            .compartment_id_for_update
            .as_deref()
            .map(|id| variable_str("compartment_id_for_update", id))
    }

    /// Writes `config` to the dump directory when config dumps are enabled
    pub fn save_config(
        &self,
        config: &str,
        service: &str,
        resource: &str,
        test_name: &str,
    ) -> Result<()> {
        if let Some(path) =
            save_config_content(config, service, resource, test_name, &self.config)?
        {
            tracing::info!("config for {} written to {}", test_name, path.display());
        }
        Ok(())
    }

    /// Runs `case` through a fresh terraform workspace
    pub async fn run(&self, test_name: &str, case: TestCase) -> Result<()> {
        let mut harness = TerraformCli::new(test_name)?;
        tracing::info!("running {} in {}", test_name, harness.work_dir().display());
        run_test_case(&mut harness, case).await
    }
}

/// Provider block parameterised by region and tenancy
pub fn provider_test_config(config: &TestConfig) -> String {
    let mut out = String::new();
    if let Some(tenancy) = &config.tenancy_id {
        out.push_str(&variable_str("tenancy_ocid", tenancy));
    }
    if let Some(region) = &config.region {
        out.push_str(&variable_str("region", region));
    }

    out.push_str("\nprovider \"oci\" {\n");
    if config.tenancy_id.is_some() {
        out.push_str("\ttenancy_ocid = \"${var.tenancy_ocid}\"\n");
    }
    if config.region.is_some() {
        out.push_str("\tregion = \"${var.region}\"\n");
    }
    out.push_str("}\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn provider_config_reads_variables() {
        let config = TestConfig {
            region: Some("us-ashburn-1".to_string()),
            tenancy_id: Some("ocid1.tenancy.oc1..tttt".to_string()),
            ..Default::default()
        };
        let out = provider_test_config(&config);
        assert!(out.contains("variable \"region\" { default = \"us-ashburn-1\" }\n"));
        assert!(out.contains("variable \"tenancy_ocid\""));
        assert!(out.ends_with(
            "provider \"oci\" {\n\ttenancy_ocid = \"${var.tenancy_ocid}\"\n\tregion = \"${var.region}\"\n}\n"
        ));
    }

    #[test]
    fn provider_config_without_region_is_bare() {
        assert_eq!(
            provider_test_config(&TestConfig::default()),
            "\nprovider \"oci\" {\n}\n"
        );
    }

    #[test]
    #[serial]
    fn setup_skips_without_tf_acc() {
        std::env::remove_var(acctest::config::TF_ACC);
        assert!(setup().unwrap().is_none());
    }

    #[test]
    #[serial]
    fn setup_requires_compartment() {
        std::env::set_var(acctest::config::TF_ACC, "1");
        std::env::remove_var(acctest::config::COMPARTMENT_OCID);
        let result = setup();
        std::env::remove_var(acctest::config::TF_ACC);

        match result {
            Err(AcctestError::InvalidConfiguration(msg)) => {
                assert!(msg.contains("TF_VAR_compartment_ocid"))
            }
            Err(other) => panic!("unexpected error {:?}", other),
            Ok(_) => panic!("expected a configuration error"),
        }
    }
}
