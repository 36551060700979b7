//! In-process plugin host
//!
//! Holds the installed-package catalogue from config and the set of mounted
//! plugins. Unmounting stops a plugin immediately but its teardown runs on a
//! background task for the configured delay; a plugin cannot be mounted again
//! until that teardown has settled.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::{watch, RwLock};

use crate::application::errors::HostError;
use crate::domain::entities::PluginDescriptor;
use crate::domain::traits::PluginHost;

#[derive(Debug, Clone)]
struct MountedPlugin {
    descriptor: PluginDescriptor,
    mounted_at: DateTime<Utc>,
}

#[derive(Default)]
struct HostState {
    mounted: RwLock<BTreeMap<String, MountedPlugin>>,
    /// Pending teardowns; the receiver flips to `true` once settled
    teardowns: Mutex<HashMap<String, watch::Receiver<bool>>>,
}

impl HostState {
    fn teardown(&self, name: &str) -> Option<watch::Receiver<bool>> {
        self.teardowns
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// Drop the pending teardown of `name` if it is still the one `own` watches
    fn settle(&self, name: &str, own: &watch::Receiver<bool>) {
        let mut teardowns = self.teardowns.lock().unwrap_or_else(PoisonError::into_inner);
        if teardowns.get(name).is_some_and(|stored| stored.same_channel(own)) {
            teardowns.remove(name);
        }
    }
}

pub struct InMemoryPluginHost {
    catalog: RwLock<Vec<PluginDescriptor>>,
    state: Arc<HostState>,
    teardown_delay: Duration,
}

impl InMemoryPluginHost {
    pub fn new(catalog: Vec<PluginDescriptor>, teardown_delay: Duration) -> Self {
        Self {
            catalog: RwLock::new(catalog),
            state: Arc::new(HostState::default()),
            teardown_delay,
        }
    }

    /// Add a package to the catalogue, replacing one with the same name
    pub async fn install(&self, descriptor: PluginDescriptor) {
        let mut catalog = self.catalog.write().await;
        catalog.retain(|d| d.name != descriptor.name);
        catalog.push(descriptor);
    }

    /// Remove a package from the catalogue. A mounted plugin stays mounted.
    pub async fn uninstall(&self, name: &str) {
        self.catalog.write().await.retain(|d| d.name != name);
    }

    /// When a mounted plugin was loaded
    pub async fn mounted_at(&self, name: &str) -> Option<DateTime<Utc>> {
        self.state.mounted.read().await.get(name).map(|p| p.mounted_at)
    }

    fn teardown_pending(&self, name: &str) -> bool {
        match self.state.teardown(name) {
            Some(rx) => {
                let settled = *rx.borrow();
                !settled
            }
            None => false,
        }
    }
}

#[async_trait]
impl PluginHost for InMemoryPluginHost {
    async fn discover_plugins(&self) -> Result<Vec<PluginDescriptor>, HostError> {
        Ok(self.catalog.read().await.clone())
    }

    async fn mounted_names(&self) -> Result<HashSet<String>, HostError> {
        Ok(self.state.mounted.read().await.keys().cloned().collect())
    }

    async fn mount(&self, descriptor: &PluginDescriptor) -> Result<(), HostError> {
        if self.teardown_pending(&descriptor.name) {
            return Err(HostError::Primitive(format!("plugin {} is still tearing down", descriptor.name)));
        }

        let mut mounted = self.state.mounted.write().await;
        if mounted.contains_key(&descriptor.name) {
            return Err(HostError::Primitive(format!("plugin {} is already mounted", descriptor.name)));
        }

        mounted.insert(descriptor.name.clone(), MountedPlugin {
            descriptor: descriptor.clone(),
            mounted_at: Utc::now(),
        });
        tracing::info!("Mounted plugin: {} ({})", descriptor.name, descriptor.folder);
        Ok(())
    }

    async fn unmount(&self, name: &str) -> Result<(), HostError> {
        let plugin = self.state.mounted.write().await.remove(name)
            .ok_or_else(|| HostError::Primitive(format!("plugin {} is not mounted", name)))?;
        tracing::info!("Unmounted plugin: {} ({})", name, plugin.descriptor.folder);

        if self.teardown_delay.is_zero() {
            return Ok(());
        }

        let (tx, rx) = watch::channel(false);
        let own = rx.clone();
        self.state
            .teardowns
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), rx);

        let state = self.state.clone();
        let delay = self.teardown_delay;
        let name = name.to_string();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(true);
            state.settle(&name, &own);
            tracing::debug!("Plugin {} teardown settled", name);
        });

        Ok(())
    }

    async fn wait_unmounted(&self, name: &str) -> Result<(), HostError> {
        let Some(mut rx) = self.state.teardown(name) else {
            return Ok(());
        };
        let settled = rx.wait_for(|settled| *settled).await.map(|_| ());
        settled.map_err(|_| HostError::Primitive(format!("teardown of plugin {} was aborted", name)))
    }
}
