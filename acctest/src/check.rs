//! State assertions run after each test step

use crate::error::{AcctestError, Result};
use crate::state::{from_instance_state, State};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// A check function run against the state produced by a step
pub type Check = Box<dyn Fn(&State) -> Result<()> + Send + Sync>;

/// Asserts `address.key == value`
pub fn check_resource_attr(address: &str, key: &str, value: &str) -> Check {
    let (address, key, value) = (address.to_string(), key.to_string(), value.to_string());
    Box::new(move |state| {
        let rs = state
            .get(&address)
            .ok_or_else(|| AcctestError::MissingResource(address.clone()))?;
        match rs.primary.attribute(&key) {
            Some(actual) if actual == value => Ok(()),
            // An empty list or map is stored as a zero count or not at all
            None if value == "0" && (key.ends_with(".#") || key.ends_with(".%")) => Ok(()),
            Some(actual) => Err(AcctestError::CheckFailed(format!(
                "{}: Attribute '{}' expected {:?}, got {:?}",
                address, key, value, actual
            ))),
            None => Err(AcctestError::CheckFailed(format!(
                "{}: Attribute '{}' expected {:?}, got nothing",
                address, key, value
            ))),
        }
    })
}

/// Asserts `address.key` exists and is non-empty
pub fn check_resource_attr_set(address: &str, key: &str) -> Check {
    let (address, key) = (address.to_string(), key.to_string());
    Box::new(move |state| {
        let actual = from_instance_state(state, &address, &key)?;
        if actual.is_empty() {
            return Err(AcctestError::CheckFailed(format!(
                "{}: Attribute '{}' expected to be set",
                address, key
            )));
        }
        Ok(())
    })
}

/// Asserts `address.key` is absent
pub fn check_no_resource_attr(address: &str, key: &str) -> Check {
    let (address, key) = (address.to_string(), key.to_string());
    Box::new(move |state| {
        let rs = state
            .get(&address)
            .ok_or_else(|| AcctestError::MissingResource(address.clone()))?;
        match rs.primary.attribute(&key) {
            None => Ok(()),
            Some("0") if key.ends_with(".#") || key.ends_with(".%") => Ok(()),
            Some(actual) => Err(AcctestError::CheckFailed(format!(
                "{}: Attribute '{}' found when not expected: {:?}",
                address, key, actual
            ))),
        }
    })
}

/// Asserts two attributes, possibly on different resources, are equal
pub fn check_resource_attr_pair(
    first_address: &str,
    first_key: &str,
    second_address: &str,
    second_key: &str,
) -> Check {
    let (a1, k1) = (first_address.to_string(), first_key.to_string());
    let (a2, k2) = (second_address.to_string(), second_key.to_string());
    Box::new(move |state| {
        let v1 = from_instance_state(state, &a1, &k1)?;
        let v2 = from_instance_state(state, &a2, &k2)?;
        if v1 != v2 {
            return Err(AcctestError::CheckFailed(format!(
                "{}: Attribute '{}' expected {:?}, got {:?} from {}.{}",
                a1, k1, v2, v1, a2, k2
            )));
        }
        Ok(())
    })
}

/// Asserts that one element of the list/set `address.key` carries all the
/// given properties. Keys listed in `ignore` are skipped.
///
/// Set elements have no stable index, so each candidate index is tried.
pub fn check_set_contains_element_with_properties(
    address: &str,
    key: &str,
    properties: BTreeMap<String, String>,
    ignore: &[&str],
) -> Check {
    let (address, key) = (address.to_string(), key.to_string());
    let ignore: Vec<String> = ignore.iter().map(|s| s.to_string()).collect();
    Box::new(move |state| {
        let count: usize = from_instance_state(state, &address, &format!("{}.#", key))?
            .parse()
            .map_err(|_| {
                AcctestError::CheckFailed(format!("{}: '{}.#' is not a count", address, key))
            })?;
        let attrs = &state
            .get(&address)
            .ok_or_else(|| AcctestError::MissingResource(address.clone()))?
            .primary
            .attributes;

        let found = (0..count).any(|i| {
            properties
                .iter()
                .filter(|(prop, _)| !ignore.contains(prop))
                .all(|(prop, expected)| {
                    attrs.get(&format!("{}.{}.{}", key, i, prop)) == Some(expected)
                })
        });

        if found {
            Ok(())
        } else {
            Err(AcctestError::CheckFailed(format!(
                "{}: no element of '{}' matches {:?}",
                address, key, properties
            )))
        }
    })
}

/// Runs checks in order and stops at the first failure
pub fn compose(checks: Vec<Check>) -> Check {
    Box::new(move |state| {
        for (i, check) in checks.iter().enumerate() {
            check(state).map_err(|e| {
                AcctestError::CheckFailed(format!("Check {}/{} error: {}", i + 1, checks.len(), e))
            })?;
        }
        Ok(())
    })
}

/// Runs every check and reports all failures together
pub fn compose_aggregate(checks: Vec<Check>) -> Check {
    Box::new(move |state| {
        let failures: Vec<String> = checks
            .iter()
            .enumerate()
            .filter_map(|(i, check)| {
                check(state)
                    .err()
                    .map(|e| format!("Check {}/{} error: {}", i + 1, checks.len(), e))
            })
            .collect();
        if failures.is_empty() {
            Ok(())
        } else {
            Err(AcctestError::CheckFailed(failures.join("\n")))
        }
    })
}

/// Remembers resource ids between steps so an update step can assert that
/// the resource was changed in place rather than replaced.
#[derive(Clone, Default)]
pub struct ResourceIdTracker {
    id: Arc<Mutex<Option<String>>>,
}

impl ResourceIdTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check that records the current id of `address`
    pub fn capture(&self, address: &str) -> Check {
        let address = address.to_string();
        let slot = Arc::clone(&self.id);
        Box::new(move |state| {
            let id = from_instance_state(state, &address, "id")?;
            let mut guard = slot
                .lock()
                .map_err(|_| AcctestError::Custom("resource id tracker poisoned".to_string()))?;
            *guard = Some(id);
            Ok(())
        })
    }

    /// Check that fails if `address` now has a different id than captured
    pub fn expect_unchanged(&self, address: &str) -> Check {
        let address = address.to_string();
        let slot = Arc::clone(&self.id);
        Box::new(move |state| {
            let current = from_instance_state(state, &address, "id")?;
            let guard = slot
                .lock()
                .map_err(|_| AcctestError::Custom("resource id tracker poisoned".to_string()))?;
            match guard.as_deref() {
                Some(previous) if previous == current => Ok(()),
                Some(_) => Err(AcctestError::CheckFailed(
                    "Resource recreated when it was supposed to be updated.".to_string(),
                )),
                None => Err(AcctestError::CheckFailed(format!(
                    "{}: no id was captured before the update step",
                    address
                ))),
            }
        })
    }

    pub fn get(&self) -> Option<String> {
        self.id.lock().ok().and_then(|g| g.clone())
    }
}
