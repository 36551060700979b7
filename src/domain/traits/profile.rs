use async_trait::async_trait;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::application::errors::ProfileError;

/// A single option of a plugin's group setting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupOption {
    /// Whether the plugin is an active service for the group
    Apply(bool),
}

impl GroupOption {
    pub fn key(&self) -> &str {
        match self {
            GroupOption::Apply(_) => "apply",
        }
    }
}

/// Per (bot, group, plugin) service setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GroupServiceSetting {
    pub apply: bool,
}

/// Group setting keyed by plugin name. Only enabled plugins appear.
pub type GroupSetting = BTreeMap<String, GroupServiceSetting>;

/// Bot profile - per bot-instance plugin enablement and group service settings
#[async_trait]
pub trait BotProfile: Send + Sync {
    /// Identifier of the bot instance owning this profile
    fn uin(&self) -> &str;

    async fn enable_plugin(&self, name: &str) -> Result<(), ProfileError>;

    async fn disable_plugin(&self, name: &str) -> Result<(), ProfileError>;

    async fn update_group_option(&self, group_id: &str, name: &str, option: GroupOption) -> Result<(), ProfileError>;

    async fn group_setting(&self, group_id: &str) -> Result<GroupSetting, ProfileError>;

    /// Enabled plugin names, sorted
    async fn enabled_plugins(&self) -> Result<Vec<String>, ProfileError>;

    async fn group_ids(&self) -> Result<Vec<String>, ProfileError>;
}
