//! Sequencing of test steps against a harness

use crate::check::Check;
use crate::config::TestConfig;
use crate::destroy::CheckDestroy;
use crate::error::{AcctestError, Result};
use crate::harness::Harness;
use crate::state::State;
use regex::Regex;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

/// Id resolver for resources whose import id is not their `id` attribute
pub type ImportIdFn = Box<dyn Fn(&State) -> Result<String> + Send + Sync>;

pub struct ImportStep {
    pub resource_name: String,
    pub verify: bool,
    pub verify_ignore: Vec<String>,
    pub id_fn: Option<ImportIdFn>,
}

impl ImportStep {
    pub fn new(resource_name: &str) -> Self {
        Self {
            resource_name: resource_name.to_string(),
            verify: true,
            verify_ignore: Vec::new(),
            id_fn: None,
        }
    }

    pub fn ignore(mut self, keys: &[&str]) -> Self {
        self.verify_ignore.extend(keys.iter().map(|k| k.to_string()));
        self
    }

    pub fn with_id_fn(mut self, id_fn: ImportIdFn) -> Self {
        self.id_fn = Some(id_fn);
        self
    }
}

pub struct TestStep {
    pub config: String,
    pub check: Option<Check>,
    pub import: Option<ImportStep>,
    pub expect_error: Option<Regex>,
    pub pre_delay: Option<Duration>,
}

impl TestStep {
    /// An apply step
    pub fn apply(config: impl Into<String>) -> Self {
        Self {
            config: config.into(),
            check: None,
            import: None,
            expect_error: None,
            pre_delay: None,
        }
    }

    /// An import step; an empty config reuses the last applied one
    pub fn import(config: impl Into<String>, import: ImportStep) -> Self {
        Self {
            import: Some(import),
            ..Self::apply(config)
        }
    }

    pub fn with_check(mut self, check: Check) -> Self {
        self.check = Some(check);
        self
    }

    pub fn expect_error(mut self, pattern: Regex) -> Self {
        self.expect_error = Some(pattern);
        self
    }

    /// Sleeps before the step runs
    pub fn with_pre_delay(mut self, delay: Duration) -> Self {
        self.pre_delay = Some(delay);
        self
    }
}

#[derive(Default)]
pub struct TestCase {
    pub steps: Vec<TestStep>,
    pub check_destroy: Vec<Box<dyn CheckDestroy>>,
}

impl TestCase {
    pub fn new(steps: Vec<TestStep>) -> Self {
        Self {
            steps,
            check_destroy: Vec::new(),
        }
    }

    pub fn with_destroy_check(mut self, check: impl CheckDestroy + 'static) -> Self {
        self.check_destroy.push(Box::new(check));
        self
    }
}

/// Runs every step, then destroys everything and runs the destroy checks
/// against the state as it was before the destroy.
///
/// The destroy always happens, even after a failed step; the step failure
/// is what gets reported in that case.
pub async fn run_test_case<H: Harness + ?Sized>(harness: &mut H, case: TestCase) -> Result<()> {
    let mut state = State::new();
    let mut last_config = String::new();
    let mut outcome = Ok(());

    for (i, step) in case.steps.iter().enumerate() {
        let number = i + 1;
        if let Some(delay) = step.pre_delay {
            tracing::info!("step {}: waiting {:?} before running", number, delay);
            tokio::time::sleep(delay).await;
        }

        tracing::info!("step {}/{}", number, case.steps.len());
        if let Err(e) = run_step(harness, step, &mut state, &mut last_config).await {
            tracing::error!("step {} failed: {}", number, e);
            outcome = Err(e.in_step(number));
            break;
        }
    }

    let destroyed = harness.destroy().await;
    if let Err(e) = outcome {
        if let Err(destroy_err) = destroyed {
            tracing::error!("destroy after failed step also failed: {}", destroy_err);
        }
        return Err(e);
    }

    let pre_destroy = destroyed?;
    for check in &case.check_destroy {
        check.check_destroy(&pre_destroy).await?;
    }
    Ok(())
}

async fn run_step<H: Harness + ?Sized>(
    harness: &mut H,
    step: &TestStep,
    state: &mut State,
    last_config: &mut String,
) -> Result<()> {
    if let Some(import) = &step.import {
        let config = if step.config.is_empty() {
            last_config.as_str()
        } else {
            step.config.as_str()
        };
        return run_import_step(harness, config, import, state).await;
    }

    match harness.apply(&step.config).await {
        Ok(new_state) => {
            if let Some(pattern) = &step.expect_error {
                return Err(AcctestError::CheckFailed(format!(
                    "expected an error matching {} but apply succeeded",
                    pattern
                )));
            }
            *state = new_state;
            *last_config = step.config.clone();
            match &step.check {
                Some(check) => check(&*state),
                None => Ok(()),
            }
        }
        Err(e) => match &step.expect_error {
            Some(pattern) if pattern.is_match(&e.to_string()) => {
                tracing::debug!("apply failed as expected: {}", e);
                Ok(())
            }
            Some(pattern) => Err(AcctestError::CheckFailed(format!(
                "expected an error matching {}, got {}",
                pattern, e
            ))),
            None => Err(e),
        },
    }
}

async fn run_import_step<H: Harness + ?Sized>(
    harness: &mut H,
    config: &str,
    import: &ImportStep,
    state: &State,
) -> Result<()> {
    let existing = state
        .get(&import.resource_name)
        .ok_or_else(|| AcctestError::MissingResource(import.resource_name.clone()))?;

    let id = match &import.id_fn {
        Some(id_fn) => id_fn(state)?,
        None => existing.primary.id.clone(),
    };
    tracing::info!("importing {} as {}", import.resource_name, id);

    let imported = harness.import(config, &import.resource_name, &id).await?;
    if !import.verify {
        return Ok(());
    }

    let actual = imported.get(&import.resource_name).ok_or_else(|| {
        AcctestError::ImportVerify(format!("{} was not imported", import.resource_name))
    })?;

    verify_imported_attributes(
        &actual.primary.attributes,
        &existing.primary.attributes,
        &import.verify_ignore,
    )
}

fn comparable(
    attributes: &BTreeMap<String, String>,
    ignore: &[String],
) -> BTreeMap<String, String> {
    attributes
        .iter()
        .filter(|(k, _)| !ignore.iter().any(|prefix| k.starts_with(prefix.as_str())))
        .filter(|(k, _)| !(k.as_str() == "timeouts" || k.starts_with("timeouts.")))
        .filter(|(k, v)| !((k.ends_with(".%") || k.ends_with(".#")) && v.as_str() == "0"))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// Compares imported against applied attributes, ignoring keys that start
/// with any of `ignore` and the `timeouts` block
pub fn verify_imported_attributes(
    actual: &BTreeMap<String, String>,
    expected: &BTreeMap<String, String>,
    ignore: &[String],
) -> Result<()> {
    let actual = comparable(actual, ignore);
    let expected = comparable(expected, ignore);
    if actual == expected {
        return Ok(());
    }

    let mut diffs = Vec::new();
    for (key, value) in &expected {
        match actual.get(key) {
            Some(v) if v == value => {}
            Some(v) => diffs.push(format!("{}: imported {:?}, expected {:?}", key, v, value)),
            None => diffs.push(format!("{}: missing from import, expected {:?}", key, value)),
        }
    }
    for (key, value) in &actual {
        if !expected.contains_key(key) {
            diffs.push(format!("{}: unexpected in import {:?}", key, value));
        }
    }
    Err(AcctestError::ImportVerify(diffs.join("; ")))
}

/// Writes a rendered configuration to `<dump dir>/<service>/<resource>/<test>.tf`
/// when config dumps are enabled
pub fn save_config_content(
    config: &str,
    service: &str,
    resource: &str,
    test_name: &str,
    test_config: &TestConfig,
) -> Result<Option<PathBuf>> {
    if !test_config.save_config {
        return Ok(None);
    }
    let dir = test_config.config_dump_dir.join(service).join(resource);
    std::fs::create_dir_all(&dir)?;
    let path = dir.join(format!("{}.tf", test_name));
    std::fs::write(&path, config)?;
    tracing::debug!("saved config for {} to {}", test_name, path.display());
    Ok(Some(path))
}
