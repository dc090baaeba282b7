//! Out-of-band cleanup of leftover cloud resources
//!
//! Every resource type contributes a [`SweepTarget`]: list what is left in a
//! compartment, delete it, and wait for the deletion to settle. The
//! [`SweeperRegistry`] holds the dependency graph between sweepers so that
//! children (subnets, route tables) are removed before their parents (VCNs).

use crate::error::{AcctestError, Result, ServiceFailure};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(3 * 60);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct SweepSettings {
    pub wait_timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for SweepSettings {
    fn default() -> Self {
        Self {
            wait_timeout: DEFAULT_WAIT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Shared bookkeeping for one sweep run: listed ids per compartment and id
/// kind, and ids of default resources that must never be deleted.
#[derive(Clone, Default)]
pub struct SweepContext {
    inner: Arc<SweepContextInner>,
}

#[derive(Default)]
struct SweepContextInner {
    settings: SweepSettings,
    resource_ids: RwLock<HashMap<(String, String), Vec<String>>>,
    default_resource_ids: RwLock<HashSet<String>>,
}

impl SweepContext {
    pub fn new(settings: SweepSettings) -> Self {
        Self {
            inner: Arc::new(SweepContextInner {
                settings,
                ..Default::default()
            }),
        }
    }

    pub fn settings(&self) -> &SweepSettings {
        &self.inner.settings
    }

    /// Marks a default resource so no sweeper deletes it
    pub async fn protect(&self, id: impl Into<String>) {
        self.inner.default_resource_ids.write().await.insert(id.into());
    }

    pub async fn is_protected(&self, id: &str) -> bool {
        self.inner.default_resource_ids.read().await.contains(id)
    }

    /// Records a listed id; ids already recorded are kept once
    pub async fn add_resource_id(&self, compartment_id: &str, id_kind: &str, id: &str) {
        let mut resource_ids = self.inner.resource_ids.write().await;
        let ids = resource_ids
            .entry((compartment_id.to_string(), id_kind.to_string()))
            .or_default();
        if !ids.iter().any(|known| known == id) {
            ids.push(id.to_string());
        }
    }

    /// Ids listed earlier in this run; `None` when nothing was recorded
    pub async fn resource_ids_to_sweep(
        &self,
        compartment_id: &str,
        id_kind: &str,
    ) -> Option<Vec<String>> {
        self.inner
            .resource_ids
            .read()
            .await
            .get(&(compartment_id.to_string(), id_kind.to_string()))
            .filter(|ids| !ids.is_empty())
            .cloned()
    }
}

#[async_trait]
pub trait SweepTarget: Send + Sync {
    type Error: ServiceFailure;

    /// Sweeper name, e.g. `CoreVcn`
    fn name(&self) -> &str;

    /// Key under which listed ids are cached, e.g. `VcnId`
    fn id_kind(&self) -> &str;

    /// Ids of live resources in the compartment
    async fn list_ids(
        &self,
        compartment_id: &str,
        ctx: &SweepContext,
    ) -> std::result::Result<Vec<String>, Self::Error>;

    async fn delete(&self, id: &str) -> std::result::Result<(), Self::Error>;

    /// Current lifecycle state; `None` for a resource that exists but has
    /// no lifecycle state, which keeps the wait polling until it 404s
    async fn lifecycle_state(&self, id: &str) -> std::result::Result<Option<String>, Self::Error>;

    /// True while the resource has not finished deleting
    fn is_pending(&self, lifecycle_state: &str) -> bool;
}

/// Polls `fetch` until `should_wait` turns false, the resource 404s, or
/// `timeout` elapses.
pub async fn wait_till_condition<F, Fut, T, E, C>(
    mut fetch: F,
    should_wait: C,
    timeout: Duration,
    interval: Duration,
) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<T, E>>,
    E: ServiceFailure,
    C: Fn(&T) -> bool,
{
    let deadline = Instant::now() + timeout;
    loop {
        match fetch().await {
            Ok(response) if !should_wait(&response) => return Ok(()),
            Ok(_) => {}
            Err(e) if e.is_not_found() => return Ok(()),
            Err(e) => return Err(AcctestError::Custom(e.to_string())),
        }

        let now = Instant::now();
        if now >= deadline {
            return Err(AcctestError::Timeout(timeout));
        }
        tokio::time::sleep(interval.min(deadline - now)).await;
    }
}

/// List, delete and wait for every unprotected resource of one type.
///
/// A failed listing aborts this type; a failed delete or wait is logged and
/// the sweep moves on to the next resource.
pub async fn sweep_resource<T: SweepTarget + ?Sized>(
    target: &T,
    compartment_id: &str,
    ctx: &SweepContext,
) -> Result<()> {
    let ids = match ctx.resource_ids_to_sweep(compartment_id, target.id_kind()).await {
        Some(ids) => ids,
        None => {
            let ids = target
                .list_ids(compartment_id, ctx)
                .await
                .map_err(|e| AcctestError::Sweep {
                    name: target.name().to_string(),
                    message: format!(
                        "Error getting {} list for compartment id : {} , {}",
                        target.id_kind(),
                        compartment_id,
                        e
                    ),
                })?;
            for id in &ids {
                ctx.add_resource_id(compartment_id, target.id_kind(), id).await;
            }
            ids
        }
    };

    tracing::info!("{}: {} candidate(s) in {}", target.name(), ids.len(), compartment_id);

    for id in ids {
        if ctx.is_protected(&id).await {
            tracing::debug!("{}: skipping default resource {}", target.name(), id);
            continue;
        }

        if let Err(e) = target.delete(&id).await {
            tracing::warn!(
                "Error deleting {} {} {}, It is possible that the resource is already deleted. Please verify manually",
                target.name(),
                id,
                e
            );
            continue;
        }

        let settings = ctx.settings();
        let waited = wait_till_condition(
            || target.lifecycle_state(&id),
            |state: &Option<String>| state.as_deref().is_none_or(|s| target.is_pending(s)),
            settings.wait_timeout,
            settings.poll_interval,
        )
        .await;
        match waited {
            Ok(()) => tracing::info!("{}: deleted {}", target.name(), id),
            Err(e) => tracing::warn!("{}: waiting for {} to delete: {}", target.name(), id, e),
        }
    }

    Ok(())
}

/// Object-safe form of a sweep, so the registry can hold every type
#[async_trait]
pub trait Sweep: Send + Sync {
    async fn sweep(&self, compartment_id: &str, ctx: &SweepContext) -> Result<()>;
}

#[async_trait]
impl<T: SweepTarget> Sweep for T {
    async fn sweep(&self, compartment_id: &str, ctx: &SweepContext) -> Result<()> {
        sweep_resource(self, compartment_id, ctx).await
    }
}

struct Sweeper {
    resource: String,
    runner: Arc<dyn Sweep>,
}

/// Outcome of a registry run
#[derive(Debug, Default)]
pub struct SweepReport {
    pub ran: Vec<String>,
    pub failures: BTreeMap<String, String>,
}

impl SweepReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Registered sweepers and the dependency graph between them.
///
/// The graph maps a resource short name (`vcn`) to the sweepers that must
/// run before that resource's own sweeper (`CoreSubnet`, `CoreRouteTable`).
#[derive(Default)]
pub struct SweeperRegistry {
    dependency_graph: HashMap<String, Vec<String>>,
    sweepers: BTreeMap<String, Sweeper>,
    exclude: Vec<String>,
}

impl SweeperRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sweepers named here are never registered
    pub fn with_exclude_list(mut self, exclude: Vec<String>) -> Self {
        self.exclude = exclude;
        self
    }

    pub fn in_exclude_list(&self, name: &str) -> bool {
        self.exclude.iter().any(|e| e == name)
    }

    /// Records that `sweeper` must run before the sweeper of `resource`
    pub fn add_dependency(&mut self, resource: &str, sweeper: &str) {
        let deps = self.dependency_graph.entry(resource.to_string()).or_default();
        if !deps.iter().any(|d| d == sweeper) {
            deps.push(sweeper.to_string());
        }
    }

    pub fn dependencies_of(&self, resource: &str) -> &[String] {
        self.dependency_graph
            .get(resource)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Registers the sweeper `name` for the resource short name `resource`
    pub fn add_sweeper(&mut self, name: &str, resource: &str, runner: impl Sweep + 'static) {
        if self.in_exclude_list(name) {
            tracing::info!("sweeper {} is excluded", name);
            return;
        }
        self.sweepers.insert(
            name.to_string(),
            Sweeper {
                resource: resource.to_string(),
                runner: Arc::new(runner),
            },
        );
    }

    pub fn names(&self) -> Vec<String> {
        self.sweepers.keys().cloned().collect()
    }

    fn dependency_names(&self, name: &str) -> &[String] {
        self.sweepers
            .get(name)
            .map(|s| self.dependencies_of(&s.resource))
            .unwrap_or(&[])
    }

    /// Orders the selected sweepers so dependencies come first. An empty
    /// selection means every registered sweeper.
    pub fn execution_order(&self, selected: &[String]) -> Result<Vec<String>> {
        let roots: Vec<String> = if selected.is_empty() {
            self.names()
        } else {
            selected.to_vec()
        };

        let mut order = Vec::new();
        let mut done = HashSet::new();
        for root in roots {
            if !self.sweepers.contains_key(&root) {
                return Err(AcctestError::Sweep {
                    name: root,
                    message: "no such sweeper".to_string(),
                });
            }
            let mut visiting = Vec::new();
            self.visit(&root, &mut visiting, &mut done, &mut order)?;
        }
        Ok(order)
    }

    fn visit(
        &self,
        name: &str,
        visiting: &mut Vec<String>,
        done: &mut HashSet<String>,
        order: &mut Vec<String>,
    ) -> Result<()> {
        if done.contains(name) {
            return Ok(());
        }
        if visiting.iter().any(|v| v == name) {
            return Err(AcctestError::DependencyCycle(name.to_string()));
        }
        visiting.push(name.to_string());
        for dep in self.dependency_names(name) {
            if !self.sweepers.contains_key(dep) {
                tracing::warn!(
                    "sweeper {} has dependency {}, but that sweeper was not found",
                    name,
                    dep
                );
                continue;
            }
            self.visit(dep, visiting, done, order)?;
        }
        visiting.pop();
        done.insert(name.to_string());
        order.push(name.to_string());
        Ok(())
    }

    /// Runs the selected sweepers once each, dependencies first. A sweeper
    /// whose dependency failed is skipped and reported as failed.
    pub async fn run(
        &self,
        compartment_id: &str,
        selected: &[String],
        ctx: &SweepContext,
    ) -> Result<SweepReport> {
        let order = self.execution_order(selected)?;
        let mut report = SweepReport::default();

        for name in order {
            let failed_dep = self
                .dependency_names(&name)
                .iter()
                .find(|dep| report.failures.contains_key(*dep))
                .cloned();
            if let Some(dep) = failed_dep {
                report
                    .failures
                    .insert(name.clone(), format!("dependency {} failed", dep));
                continue;
            }

            let Some(sweeper) = self.sweepers.get(&name) else {
                continue;
            };
            tracing::info!("running sweeper {}", name);
            match sweeper.runner.sweep(compartment_id, ctx).await {
                Ok(()) => report.ran.push(name),
                Err(e) => {
                    tracing::error!("sweeper {} failed: {}", name, e);
                    report.failures.insert(name, e.to_string());
                }
            }
        }

        Ok(report)
    }
}
