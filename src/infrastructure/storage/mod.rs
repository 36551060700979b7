//! In-memory bot profile store

use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::application::errors::ProfileError;
use crate::domain::traits::{BotProfile, GroupOption, GroupServiceSetting, GroupSetting, PluginHost};

/// Profile of one bot instance.
///
/// Enforces the narrowing below the host: only mounted plugins can be
/// enabled, and only enabled plugins get group settings.
pub struct InMemoryProfileStore {
    uin: String,
    host: Arc<dyn PluginHost>,
    default_apply: bool,
    enabled: RwLock<BTreeSet<String>>,
    groups: RwLock<BTreeMap<String, BTreeMap<String, GroupServiceSetting>>>,
}

impl InMemoryProfileStore {
    pub fn new(uin: impl Into<String>, host: Arc<dyn PluginHost>, default_apply: bool) -> Self {
        Self {
            uin: uin.into(),
            host,
            default_apply,
            enabled: RwLock::new(BTreeSet::new()),
            groups: RwLock::new(BTreeMap::new()),
        }
    }

    /// Make a group known to the bot
    pub async fn join_group(&self, group_id: impl Into<String>) {
        self.groups.write().await.entry(group_id.into()).or_default();
    }
}

#[async_trait]
impl BotProfile for InMemoryProfileStore {
    fn uin(&self) -> &str {
        &self.uin
    }

    async fn enable_plugin(&self, name: &str) -> Result<(), ProfileError> {
        let mounted = self.host.mounted_names().await
            .map_err(|e| ProfileError::Storage(e.to_string()))?;
        if !mounted.contains(name) {
            return Err(ProfileError::Rejected(format!("plugin {} is not mounted", name)));
        }

        self.enabled.write().await.insert(name.to_string());
        Ok(())
    }

    async fn disable_plugin(&self, name: &str) -> Result<(), ProfileError> {
        if !self.enabled.write().await.remove(name) {
            return Err(ProfileError::Rejected(format!("plugin {} is not enabled", name)));
        }

        for setting in self.groups.write().await.values_mut() {
            setting.remove(name);
        }
        Ok(())
    }

    async fn update_group_option(&self, group_id: &str, name: &str, option: GroupOption) -> Result<(), ProfileError> {
        if !self.enabled.read().await.contains(name) {
            return Err(ProfileError::Rejected(format!("plugin {} is not enabled for bot {}", name, self.uin)));
        }

        let mut groups = self.groups.write().await;
        let setting = groups.entry(group_id.to_string()).or_default();
        match option {
            GroupOption::Apply(apply) => {
                setting.insert(name.to_string(), GroupServiceSetting { apply });
            }
        }
        tracing::debug!("Group {} option {} of {} updated", group_id, option.key(), name);
        Ok(())
    }

    async fn group_setting(&self, group_id: &str) -> Result<GroupSetting, ProfileError> {
        let enabled = self.enabled.read().await;
        let groups = self.groups.read().await;
        let stored = groups.get(group_id);

        let setting = enabled
            .iter()
            .map(|name| {
                let setting = stored
                    .and_then(|s| s.get(name).copied())
                    .unwrap_or(GroupServiceSetting { apply: self.default_apply });
                (name.clone(), setting)
            })
            .collect();
        Ok(setting)
    }

    async fn enabled_plugins(&self) -> Result<Vec<String>, ProfileError> {
        Ok(self.enabled.read().await.iter().cloned().collect())
    }

    async fn group_ids(&self) -> Result<Vec<String>, ProfileError> {
        Ok(self.groups.read().await.keys().cloned().collect())
    }
}
