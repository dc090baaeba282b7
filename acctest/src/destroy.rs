//! Post-destroy verification
//!
//! After the harness tears everything down, every instance that was tracked
//! in state is looked up once more. The lookup must either 404 or report a
//! lifecycle state the resource type considers deleted.

use crate::error::{AcctestError, Result, ServiceFailure};
use crate::state::{InstanceState, State};
use async_trait::async_trait;

#[async_trait]
pub trait DestroyTarget: Send + Sync {
    type Error: ServiceFailure;

    /// Terraform resource type, e.g. `oci_core_vcn`
    fn resource_type(&self) -> &str;

    /// Lifecycle states that count as deleted. Empty for resources that have
    /// no lifecycle state and only disappear.
    fn deleted_states(&self) -> &[&str];

    /// Looks up the instance; `Ok(None)` means it exists without a lifecycle state
    async fn fetch_lifecycle_state(
        &self,
        instance: &InstanceState,
    ) -> std::result::Result<Option<String>, Self::Error>;
}

/// Verifies one resource type against the pre-destroy state
pub async fn check_destroyed<T: DestroyTarget + ?Sized>(state: &State, target: &T) -> Result<()> {
    let resource_type = target.resource_type();
    let mut found = false;

    for (address, rs) in state.resources_of_type(resource_type) {
        found = true;
        match target.fetch_lifecycle_state(&rs.primary).await {
            Ok(Some(lifecycle_state)) => {
                if !target.deleted_states().contains(&lifecycle_state.as_str()) {
                    return Err(AcctestError::DestroyCheck(format!(
                        "{}: resource lifecycle state: {} is not in expected deleted lifecycle states",
                        address, lifecycle_state
                    )));
                }
                tracing::debug!("{} reached deleted state {}", address, lifecycle_state);
            }
            Ok(None) => {
                return Err(AcctestError::DestroyCheck(format!(
                    "{}: resource still exists",
                    address
                )));
            }
            Err(e) if e.is_not_found() => {
                tracing::debug!("{} is gone", address);
            }
            Err(e) => {
                return Err(AcctestError::DestroyCheck(format!("{}: {}", address, e)));
            }
        }
    }

    if !found {
        return Err(AcctestError::DestroyCheck(format!(
            "at least one {} resource was expected from the state file, but could not be found",
            resource_type
        )));
    }
    Ok(())
}

/// Object-safe form of a destroy check, so a test case can hold checks for
/// several resource types
#[async_trait]
pub trait CheckDestroy: Send + Sync {
    async fn check_destroy(&self, state: &State) -> Result<()>;
}

#[async_trait]
impl<T: DestroyTarget> CheckDestroy for T {
    async fn check_destroy(&self, state: &State) -> Result<()> {
        check_destroyed(state, self).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Debug, thiserror::Error)]
    #[error("service error {0}")]
    struct FakeError(u16);

    impl ServiceFailure for FakeError {
        fn http_status(&self) -> Option<u16> {
            Some(self.0)
        }
    }

    enum Outcome {
        State(&'static str),
        Exists,
        Status(u16),
    }

    struct FakeTarget {
        outcomes: HashMap<String, Outcome>,
    }

    #[async_trait]
    impl DestroyTarget for FakeTarget {
        type Error = FakeError;

        fn resource_type(&self) -> &str {
            "oci_core_vcn"
        }

        fn deleted_states(&self) -> &[&str] {
            &["TERMINATED"]
        }

        async fn fetch_lifecycle_state(
            &self,
            instance: &InstanceState,
        ) -> std::result::Result<Option<String>, FakeError> {
            match self.outcomes.get(&instance.id) {
                Some(Outcome::State(s)) => Ok(Some(s.to_string())),
                Some(Outcome::Exists) => Ok(None),
                Some(Outcome::Status(code)) => Err(FakeError(*code)),
                None => Err(FakeError(404)),
            }
        }
    }

    fn state(ids: &[&str]) -> State {
        let mut state = State::new();
        for (i, id) in ids.iter().enumerate() {
            state.insert_resource("oci_core_vcn", &format!("vcn{}", i), InstanceState::new(*id));
        }
        state
    }

    fn target(outcomes: Vec<(&str, Outcome)>) -> FakeTarget {
        FakeTarget {
            outcomes: outcomes.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
        }
    }

    #[tokio::test]
    async fn terminated_and_missing_pass() {
        let t = target(vec![("a", Outcome::State("TERMINATED")), ("b", Outcome::Status(404))]);
        assert!(check_destroyed(&state(&["a", "b"]), &t).await.is_ok());
    }

    #[tokio::test]
    async fn live_lifecycle_state_fails() {
        let t = target(vec![("a", Outcome::State("AVAILABLE"))]);
        let err = check_destroyed(&state(&["a"]), &t).await.unwrap_err();
        assert!(err.to_string().contains("AVAILABLE is not in expected deleted lifecycle states"));
    }

    #[tokio::test]
    async fn existing_resource_without_state_fails() {
        let t = target(vec![("a", Outcome::Exists)]);
        let err = check_destroyed(&state(&["a"]), &t).await.unwrap_err();
        assert!(err.to_string().contains("still exists"));
    }

    #[tokio::test]
    async fn non_404_error_fails() {
        let t = target(vec![("a", Outcome::Status(500))]);
        let err = check_destroyed(&state(&["a"]), &t).await.unwrap_err();
        assert!(err.to_string().contains("service error 500"));
    }

    #[tokio::test]
    async fn no_tracked_resource_fails() {
        let t = target(vec![]);
        let mut s = State::new();
        s.insert_resource("oci_core_subnet", "test_subnet", InstanceState::new("x"));
        let err = check_destroyed(&s, &t).await.unwrap_err();
        assert!(err.to_string().contains("at least one oci_core_vcn resource was expected"));
    }

    #[tokio::test]
    async fn boxed_destroy_check_runs_target() {
        let check: Box<dyn CheckDestroy> =
            Box::new(target(vec![("a", Outcome::State("TERMINATED"))]));
        assert!(check.check_destroy(&state(&["a"])).await.is_ok());
        assert!(check.check_destroy(&State::new()).await.is_err());
    }
}
