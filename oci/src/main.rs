use acctest::{SweepContext, SweepSettings, SweeperRegistry, TestConfig};
use oci::{register_sweepers, OracleClients};

/// Usage: oci-sweeper [SWEEPER...]
///
/// Sweeps `TF_VAR_compartment_ocid` with the named sweepers, or all of them.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let selected: Vec<String> = std::env::args().skip(1).collect();
    let config = TestConfig::from_env();
    let compartment_id = config.compartment_id()?.to_string();
    let clients = OracleClients::from_config(&config)?;

    let mut registry = SweeperRegistry::new().with_exclude_list(config.sweep_exclude_list.clone());
    register_sweepers(&mut registry, &clients);

    let ctx = SweepContext::new(SweepSettings::default());
    let report = registry.run(&compartment_id, &selected, &ctx).await?;

    tracing::info!("swept {} resource type(s): {}", report.ran.len(), report.ran.join(", "));
    for (name, failure) in &report.failures {
        tracing::error!("{}: {}", name, failure);
    }

    if !report.is_success() {
        std::process::exit(1);
    }
    Ok(())
}
