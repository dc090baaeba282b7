//! The seam between the test driver and Terraform itself
//!
//! The driver only needs three operations: apply a configuration, import an
//! existing object, and destroy everything. [`TerraformCli`] performs them by
//! running the `terraform` binary in a private working directory.

use crate::error::{AcctestError, Result};
use crate::state::State;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;

pub const TERRAFORM_PATH: &str = "TF_ACC_TERRAFORM_PATH";

#[async_trait]
pub trait Harness: Send {
    /// Applies `config` and returns the resulting state
    async fn apply(&mut self, config: &str) -> Result<State>;

    /// Imports `id` into `address` in a scratch workspace using `config` and
    /// returns the imported state
    async fn import(&mut self, config: &str, address: &str, id: &str) -> Result<State>;

    /// Destroys everything and returns the state as it was before the destroy
    async fn destroy(&mut self) -> Result<State>;
}

pub struct TerraformCli {
    binary: PathBuf,
    work_dir: PathBuf,
    initialized: bool,
    imports: usize,
}

impl TerraformCli {
    /// Creates a working directory under the system temp dir. The binary is
    /// taken from `TF_ACC_TERRAFORM_PATH`, falling back to `terraform` on PATH.
    pub fn new(test_name: &str) -> Result<Self> {
        let binary = std::env::var(TERRAFORM_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("terraform"));
        let work_dir = std::env::temp_dir().join(format!(
            "acctest-{}-{}",
            test_name,
            crate::config::random_string(8)
        ));
        std::fs::create_dir_all(&work_dir)?;

        Ok(Self {
            binary,
            work_dir,
            initialized: false,
            imports: 0,
        })
    }

    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    async fn run(&self, dir: &Path, args: &[&str]) -> Result<String> {
        tracing::debug!("running terraform {} in {}", args.join(" "), dir.display());

        let output = Command::new(&self.binary)
            .args(args)
            .current_dir(dir)
            .env("TF_IN_AUTOMATION", "1")
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            tracing::error!("terraform {} failed: {}", args[0], stderr);
            return Err(AcctestError::Terraform {
                command: args.join(" "),
                stderr,
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    async fn write_config(dir: &Path, config: &str) -> Result<()> {
        tokio::fs::write(dir.join("main.tf"), config).await?;
        Ok(())
    }

    async fn init(&self, dir: &Path) -> Result<()> {
        self.run(dir, &["init", "-input=false", "-no-color"]).await?;
        Ok(())
    }

    async fn show(&self, dir: &Path) -> Result<State> {
        let stdout = self.run(dir, &["show", "-json", "-no-color"]).await?;
        let json: serde_json::Value = serde_json::from_str(&stdout)?;
        State::from_show_json(&json)
    }
}

#[async_trait]
impl Harness for TerraformCli {
    async fn apply(&mut self, config: &str) -> Result<State> {
        Self::write_config(&self.work_dir, config).await?;
        if !self.initialized {
            self.init(&self.work_dir).await?;
            self.initialized = true;
        }
        self.run(
            &self.work_dir,
            &["apply", "-auto-approve", "-input=false", "-no-color"],
        )
        .await?;
        self.show(&self.work_dir).await
    }

    async fn import(&mut self, config: &str, address: &str, id: &str) -> Result<State> {
        self.imports += 1;
        let dir = self.work_dir.join(format!("import-{}", self.imports));
        tokio::fs::create_dir_all(&dir).await?;
        Self::write_config(&dir, config).await?;
        self.init(&dir).await?;
        self.run(&dir, &["import", "-input=false", "-no-color", address, id])
            .await?;
        let state = self.show(&dir).await;

        if let Err(e) = tokio::fs::remove_dir_all(&dir).await {
            tracing::warn!("failed to remove import workspace {}: {}", dir.display(), e);
        }
        state
    }

    async fn destroy(&mut self) -> Result<State> {
        if !self.initialized {
            return Ok(State::new());
        }
        let state = self.show(&self.work_dir).await?;
        self.run(
            &self.work_dir,
            &["destroy", "-auto-approve", "-input=false", "-no-color"],
        )
        .await?;
        Ok(state)
    }
}

impl Drop for TerraformCli {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.work_dir);
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    const SHOW_JSON: &str = r#"{"format_version":"1.0","values":{"root_module":{"resources":[{"address":"oci_core_vcn.test_vcn","mode":"managed","type":"oci_core_vcn","name":"test_vcn","values":{"id":"ocid1.vcn.oc1..aaaa","cidr_block":"10.0.0.0/16"}}]}}}"#;

    fn fake_terraform(dir: &Path, apply_exit: i32) -> PathBuf {
        let path = dir.join("fake-terraform");
        let script = format!(
            "#!/bin/sh\ncase \"$1\" in\n  show) echo '{}' ;;\n  apply) echo 'Error: creating vcn: 400-InvalidParameter' >&2; exit {} ;;\n  *) exit 0 ;;\nesac\n",
            SHOW_JSON, apply_exit
        );
        std::fs::write(&path, script).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "acctest-bin-{}-{}",
            name,
            crate::config::random_string(6)
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[tokio::test]
    async fn apply_writes_config_and_reads_state() {
        let bin_dir = scratch_dir("apply");
        let mut cli = TerraformCli::new("apply").unwrap().with_binary(fake_terraform(&bin_dir, 0));

        let state = cli.apply("resource \"oci_core_vcn\" \"test_vcn\" {}\n").await.unwrap();
        assert_eq!(state.get("oci_core_vcn.test_vcn").unwrap().primary.id, "ocid1.vcn.oc1..aaaa");

        let written = std::fs::read_to_string(cli.work_dir().join("main.tf")).unwrap();
        assert!(written.contains("oci_core_vcn"));

        let before = cli.destroy().await.unwrap();
        assert_eq!(before.resources.len(), 1);

        std::fs::remove_dir_all(bin_dir).unwrap();
    }

    #[tokio::test]
    async fn failed_apply_surfaces_stderr() {
        let bin_dir = scratch_dir("fail");
        let mut cli = TerraformCli::new("fail").unwrap().with_binary(fake_terraform(&bin_dir, 1));

        let err = cli.apply("").await.unwrap_err();
        match err {
            AcctestError::Terraform { command, stderr } => {
                assert!(command.starts_with("apply"));
                assert!(stderr.contains("400-InvalidParameter"));
            }
            other => panic!("unexpected error {:?}", other),
        }

        std::fs::remove_dir_all(bin_dir).unwrap();
    }

    #[tokio::test]
    async fn import_uses_scratch_workspace() {
        let bin_dir = scratch_dir("import");
        let mut cli = TerraformCli::new("import").unwrap().with_binary(fake_terraform(&bin_dir, 0));

        let state = cli
            .import("", "oci_core_vcn.test_vcn", "ocid1.vcn.oc1..aaaa")
            .await
            .unwrap();
        assert!(state.get("oci_core_vcn.test_vcn").is_some());
        assert!(!cli.work_dir().join("import-1").exists());

        std::fs::remove_dir_all(bin_dir).unwrap();
    }

    #[tokio::test]
    async fn destroy_before_apply_is_empty() {
        let mut cli = TerraformCli::new("noop").unwrap();
        assert!(cli.destroy().await.unwrap().is_empty());
    }
}
