//! Plugin lifecycle manager - global discovery, mount, unmount and reload

use std::sync::Arc;
use tracing::{debug, warn};

use crate::application::errors::{HostError, TransitionError};
use crate::application::services::batch::BatchRunner;
use crate::domain::entities::{BatchReport, PluginCatalog, PluginDescriptor, PluginState, Transition};
use crate::domain::traits::PluginHost;

/// Outcome of one name, or a query failure that ends the batch
type Step = Result<Result<(), TransitionError>, HostError>;

/// Tracks discovered vs. mounted plugins and performs mount-level transitions.
///
/// Discovery is re-read at the start of every batch and the mounted set is
/// re-read for every name under that name's lock; nothing is cached between
/// calls. Query failures from the host propagate, per-name failures never do.
pub struct PluginLifecycleManager {
    host: Arc<dyn PluginHost>,
    runner: BatchRunner,
}

impl PluginLifecycleManager {
    pub fn new(host: Arc<dyn PluginHost>, runner: BatchRunner) -> Self {
        Self { host, runner }
    }

    /// Discovered plugins partitioned into local and dependency buckets
    pub async fn list(&self) -> Result<PluginCatalog, HostError> {
        let universe = self.host.discover_plugins().await?;
        Ok(PluginCatalog::from_descriptors(&universe))
    }

    pub async fn mount(&self, names: &[String]) -> Result<BatchReport, HostError> {
        let universe = self.host.discover_plugins().await?;
        let universe = universe.as_slice();
        self.runner
            .try_run(Transition::Mount, names, |name| self.mount_one(name, universe))
            .await
    }

    pub async fn unmount(&self, names: &[String]) -> Result<BatchReport, HostError> {
        let universe = self.host.discover_plugins().await?;
        let universe = universe.as_slice();
        self.runner
            .try_run(Transition::Unmount, names, |name| self.unmount_one(name, universe))
            .await
    }

    /// Unmount then mount each plugin with its own descriptor.
    ///
    /// The mount only starts once the host reports the unmount teardown as
    /// settled. Not atomic: a failed mount leaves the plugin unmounted.
    pub async fn reload(&self, names: &[String]) -> Result<BatchReport, HostError> {
        let universe = self.host.discover_plugins().await?;
        let universe = universe.as_slice();
        self.runner
            .try_run(Transition::Reload, names, |name| self.reload_one(name, universe))
            .await
    }

    async fn observe(&self, name: &str, descriptor: Option<&PluginDescriptor>) -> Result<PluginState, HostError> {
        let mounted = self.host.mounted_names().await?.contains(name);
        let state = PluginState::observe(descriptor.is_some(), mounted);
        if state == PluginState::Orphaned {
            warn!("Plugin '{}' is mounted but no longer discovered", name);
        }
        debug!("Plugin '{}' observed as {}", name, state);
        Ok(state)
    }

    async fn mount_one(&self, name: &str, universe: &[PluginDescriptor]) -> Step {
        let descriptor = PluginDescriptor::find(universe, name);
        let state = self.observe(name, descriptor).await?;
        Ok(self.mount_checked(state, descriptor).await)
    }

    async fn unmount_one(&self, name: &str, universe: &[PluginDescriptor]) -> Step {
        let state = self.observe(name, PluginDescriptor::find(universe, name)).await?;
        Ok(self.unmount_checked(state, name).await)
    }

    async fn reload_one(&self, name: &str, universe: &[PluginDescriptor]) -> Step {
        let descriptor = PluginDescriptor::find(universe, name);
        let state = self.observe(name, descriptor).await?;
        Ok(self.reload_checked(state, descriptor).await)
    }

    async fn mount_checked(&self, state: PluginState, descriptor: Option<&PluginDescriptor>) -> Result<(), TransitionError> {
        Transition::Mount.precondition(state)?;
        let descriptor = descriptor.ok_or(TransitionError::NotFound)?;
        self.host.mount(descriptor).await?;
        Ok(())
    }

    async fn unmount_checked(&self, state: PluginState, name: &str) -> Result<(), TransitionError> {
        Transition::Unmount.precondition(state)?;
        self.host.unmount(name).await?;
        Ok(())
    }

    async fn reload_checked(&self, state: PluginState, descriptor: Option<&PluginDescriptor>) -> Result<(), TransitionError> {
        Transition::Reload.precondition(state)?;
        let descriptor = descriptor.ok_or(TransitionError::NotFound)?;

        self.host.unmount(&descriptor.name).await?;
        self.host.wait_unmounted(&descriptor.name).await?;
        debug!("Plugin '{}' teardown settled, mounting again", descriptor.name);

        self.host.mount(descriptor).await?;
        Ok(())
    }
}
