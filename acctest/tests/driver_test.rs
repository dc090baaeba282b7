//! Tests for step sequencing with an in-memory harness

#![allow(clippy::disallowed_methods)] // Allow unwrap() in tests for clarity

use acctest::{
    check_resource_attr, compose_aggregate, run_test_case, AcctestError, DestroyTarget, Harness,
    ImportStep, InstanceState, ResourceIdTracker, Result, ServiceFailure, State, TestCase,
    TestStep,
};
use async_trait::async_trait;
use regex::Regex;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Apply(String),
    Import(String, String),
    Destroy,
}

/// Replays canned results and records every call it receives
#[derive(Default)]
struct FakeHarness {
    applies: VecDeque<Result<State>>,
    imports: VecDeque<Result<State>>,
    current: State,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl FakeHarness {
    fn with_apply(mut self, result: Result<State>) -> Self {
        self.applies.push_back(result);
        self
    }

    fn with_import(mut self, result: Result<State>) -> Self {
        self.imports.push_back(result);
        self
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Harness for FakeHarness {
    async fn apply(&mut self, config: &str) -> Result<State> {
        self.calls.lock().unwrap().push(Call::Apply(config.to_string()));
        let result = self
            .applies
            .pop_front()
            .unwrap_or_else(|| Err(AcctestError::Custom("no apply queued".to_string())));
        if let Ok(state) = &result {
            self.current = state.clone();
        }
        result
    }

    async fn import(&mut self, _config: &str, address: &str, id: &str) -> Result<State> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Import(address.to_string(), id.to_string()));
        self.imports
            .pop_front()
            .unwrap_or_else(|| Err(AcctestError::Custom("no import queued".to_string())))
    }

    async fn destroy(&mut self) -> Result<State> {
        self.calls.lock().unwrap().push(Call::Destroy);
        Ok(std::mem::take(&mut self.current))
    }
}

fn vcn_state(id: &str, display_name: &str) -> State {
    let mut state = State::new();
    state.insert_resource(
        "oci_core_vcn",
        "test_vcn",
        InstanceState::new(id)
            .with_attribute("display_name", display_name)
            .with_attribute("cidr_block", "10.0.0.0/16"),
    );
    state
}

#[tokio::test]
async fn steps_run_in_order_then_destroy() {
    let mut harness = FakeHarness::default()
        .with_apply(Ok(vcn_state("ocid1.vcn.a", "displayName")))
        .with_apply(Ok(vcn_state("ocid1.vcn.a", "displayName2")));

    let tracker = ResourceIdTracker::new();
    let case = TestCase::new(vec![
        TestStep::apply("config-1").with_check(compose_aggregate(vec![
            check_resource_attr("oci_core_vcn.test_vcn", "display_name", "displayName"),
            tracker.capture("oci_core_vcn.test_vcn"),
        ])),
        TestStep::apply("config-2").with_check(compose_aggregate(vec![
            check_resource_attr("oci_core_vcn.test_vcn", "display_name", "displayName2"),
            tracker.expect_unchanged("oci_core_vcn.test_vcn"),
        ])),
    ]);

    run_test_case(&mut harness, case).await.unwrap();
    assert_eq!(
        harness.calls(),
        vec![
            Call::Apply("config-1".to_string()),
            Call::Apply("config-2".to_string()),
            Call::Destroy,
        ]
    );
}

#[tokio::test]
async fn failing_check_aborts_but_still_destroys() {
    let mut harness = FakeHarness::default()
        .with_apply(Ok(vcn_state("ocid1.vcn.a", "displayName")))
        .with_apply(Ok(vcn_state("ocid1.vcn.a", "displayName")));

    let case = TestCase::new(vec![
        TestStep::apply("config-1").with_check(check_resource_attr(
            "oci_core_vcn.test_vcn",
            "display_name",
            "other",
        )),
        TestStep::apply("never-applied"),
    ]);

    let err = run_test_case(&mut harness, case).await.unwrap_err();
    match err {
        AcctestError::StepFailed { step, source } => {
            assert_eq!(step, 1);
            assert!(source.to_string().contains("expected \"other\""));
        }
        other => panic!("unexpected error {:?}", other),
    }
    assert_eq!(
        harness.calls(),
        vec![Call::Apply("config-1".to_string()), Call::Destroy]
    );
}

#[tokio::test]
async fn expected_error_is_matched() {
    let mut harness = FakeHarness::default().with_apply(Err(AcctestError::Terraform {
        command: "apply".to_string(),
        stderr: "Error: 400-InvalidParameter, cidr block overlaps".to_string(),
    }));

    let case = TestCase::new(vec![
        TestStep::apply("bad").expect_error(Regex::new("InvalidParameter").unwrap())
    ]);
    tokio_test::assert_ok!(run_test_case(&mut harness, case).await);
}

#[tokio::test]
async fn expected_error_that_never_happens_fails() {
    let mut harness =
        FakeHarness::default().with_apply(Ok(vcn_state("ocid1.vcn.a", "displayName")));

    let case = TestCase::new(vec![
        TestStep::apply("ok").expect_error(Regex::new("InvalidParameter").unwrap())
    ]);
    let err = tokio_test::assert_err!(run_test_case(&mut harness, case).await);
    assert!(err.to_string().contains("apply succeeded"));
}

#[tokio::test]
async fn import_uses_existing_id_and_verifies() {
    let mut imported = vcn_state("ocid1.vcn.a", "displayName");
    imported
        .resources
        .get_mut("oci_core_vcn.test_vcn")
        .unwrap()
        .primary
        .attributes
        .remove("cidr_block");

    let mut harness = FakeHarness::default()
        .with_apply(Ok(vcn_state("ocid1.vcn.a", "displayName")))
        .with_import(Ok(imported.clone()))
        .with_apply(Ok(vcn_state("ocid1.vcn.a", "displayName")))
        .with_import(Ok(imported));

    let case = TestCase::new(vec![
        TestStep::apply("config"),
        TestStep::import(
            "",
            ImportStep::new("oci_core_vcn.test_vcn").ignore(&["cidr_block"]),
        ),
    ]);
    run_test_case(&mut harness, case).await.unwrap();
    assert!(harness.calls().contains(&Call::Import(
        "oci_core_vcn.test_vcn".to_string(),
        "ocid1.vcn.a".to_string()
    )));

    let case = TestCase::new(vec![
        TestStep::apply("config"),
        TestStep::import("", ImportStep::new("oci_core_vcn.test_vcn")),
    ]);
    let err = run_test_case(&mut harness, case).await.unwrap_err();
    assert!(err.to_string().contains("cidr_block: missing from import"));
}

#[tokio::test]
async fn import_id_fn_overrides_id() {
    let mut harness = FakeHarness::default()
        .with_apply(Ok(vcn_state("ocid1.vcn.a", "displayName")))
        .with_import(Ok(vcn_state("ocid1.vcn.a", "displayName")));

    let case = TestCase::new(vec![
        TestStep::apply("config"),
        TestStep::import(
            "",
            ImportStep::new("oci_core_vcn.test_vcn").with_id_fn(Box::new(|state| {
                let id = acctest::from_instance_state(state, "oci_core_vcn.test_vcn", "id")?;
                Ok(format!("composite/{}", id))
            })),
        ),
    ]);
    run_test_case(&mut harness, case).await.unwrap();
    assert!(harness.calls().contains(&Call::Import(
        "oci_core_vcn.test_vcn".to_string(),
        "composite/ocid1.vcn.a".to_string()
    )));
}

#[derive(Debug, thiserror::Error)]
#[error("status {0}")]
struct StatusError(u16);

impl ServiceFailure for StatusError {
    fn http_status(&self) -> Option<u16> {
        Some(self.0)
    }
}

struct RecordingTarget {
    seen: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl DestroyTarget for RecordingTarget {
    type Error = StatusError;

    fn resource_type(&self) -> &str {
        "oci_core_vcn"
    }

    fn deleted_states(&self) -> &[&str] {
        &["TERMINATED"]
    }

    async fn fetch_lifecycle_state(
        &self,
        instance: &InstanceState,
    ) -> std::result::Result<Option<String>, StatusError> {
        self.seen.lock().unwrap().push(instance.id.clone());
        Err(StatusError(404))
    }
}

#[tokio::test]
async fn destroy_checks_see_pre_destroy_state() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut harness =
        FakeHarness::default().with_apply(Ok(vcn_state("ocid1.vcn.a", "displayName")));

    let case = TestCase::new(vec![TestStep::apply("config")]).with_destroy_check(RecordingTarget {
        seen: Arc::clone(&seen),
    });
    run_test_case(&mut harness, case).await.unwrap();
    assert_eq!(*seen.lock().unwrap(), vec!["ocid1.vcn.a".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn pre_delay_sleeps_before_step() {
    let mut harness =
        FakeHarness::default().with_apply(Ok(vcn_state("ocid1.vcn.a", "displayName")));

    let started = tokio::time::Instant::now();
    let case = TestCase::new(vec![
        TestStep::apply("config").with_pre_delay(Duration::from_secs(60))
    ]);
    run_test_case(&mut harness, case).await.unwrap();
    assert!(started.elapsed() >= Duration::from_secs(60));
}
