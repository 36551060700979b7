use async_trait::async_trait;
use std::collections::HashSet;

use crate::application::errors::HostError;
use crate::domain::entities::PluginDescriptor;

/// Plugin host - the framework's discovery, mount-state and mount/unmount primitives
#[async_trait]
pub trait PluginHost: Send + Sync {
    /// Every plugin package the host can currently find, in discovery order
    async fn discover_plugins(&self) -> Result<Vec<PluginDescriptor>, HostError>;

    /// Names of plugins whose code is loaded and receiving events
    async fn mounted_names(&self) -> Result<HashSet<String>, HostError>;

    /// Load a plugin into the running process
    async fn mount(&self, descriptor: &PluginDescriptor) -> Result<(), HostError>;

    /// Stop a plugin receiving events. Teardown may continue after this returns.
    async fn unmount(&self, name: &str) -> Result<(), HostError>;

    /// Resolves once any teardown started by `unmount` has fully settled
    async fn wait_unmounted(&self, _name: &str) -> Result<(), HostError> {
        Ok(())
    }
}
