//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use crate::application::errors::ConfigError;
use crate::domain::entities::{PluginDescriptor, PluginOrigin};

/// Bot configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    pub bot: BotConfig,
    pub plugins: PluginConfig,
    pub admin: AdminConfig,
    pub adapters: AdaptersConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct BotConfig {
    pub name: String,
    pub prefix: String,
    /// Identifier of the bot instance whose profile the console drives
    pub uin: String,
}

/// Installed plugin packages known to the in-process host
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct PluginConfig {
    pub catalog: Vec<PluginDescriptor>,
    /// Mounted at startup, in order
    pub auto_mount: Vec<String>,
    /// How long unmount teardown keeps running after unmount returns
    pub teardown_delay_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct AdminConfig {
    /// Budget for one plugin name's transition inside a batch
    pub transition_timeout_ms: u64,
    /// `apply` value of a group setting that was never explicitly set
    pub default_apply: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct AdaptersConfig {
    pub console: Option<ConsoleConfig>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConsoleConfig {
    /// Treat console input as coming from this group
    pub group_id: Option<String>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: "carik-bot".to_string(),
            prefix: "/".to_string(),
            uin: "console".to_string(),
        }
    }
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            catalog: vec![
                PluginDescriptor::new("greeting", "greeting", PluginOrigin::Local),
                PluginDescriptor::new("rss", "rss", PluginOrigin::Local),
                PluginDescriptor::new("weather", "carik-plugin-weather", PluginOrigin::Dependency),
            ],
            auto_mount: vec!["greeting".to_string()],
            teardown_delay_ms: 200,
        }
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            transition_timeout_ms: 30_000,
            default_apply: true,
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults with environment overrides, used when no config file exists
    pub fn load_env() -> Self {
        let mut config = Config::default();
        config.apply_env();
        config
    }

    /// Override fields from environment variables
    pub fn apply_env(&mut self) {
        if let Ok(prefix) = std::env::var("BOT_PREFIX") {
            self.bot.prefix = prefix;
        }

        if let Ok(timeout) = std::env::var("ADMIN_TRANSITION_TIMEOUT_MS") {
            match timeout.parse() {
                Ok(ms) => self.admin.transition_timeout_ms = ms,
                Err(_) => tracing::warn!("Ignoring invalid ADMIN_TRANSITION_TIMEOUT_MS: {}", timeout),
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.admin.transition_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue("admin.transition-timeout-ms must be positive".to_string()));
        }

        for name in &self.plugins.auto_mount {
            if PluginDescriptor::find(&self.plugins.catalog, name).is_none() {
                return Err(ConfigError::InvalidValue(format!(
                    "plugins.auto-mount lists '{}' which is not in plugins.catalog",
                    name
                )));
            }
        }

        Ok(())
    }

    pub fn transition_timeout(&self) -> Duration {
        Duration::from_millis(self.admin.transition_timeout_ms)
    }

    pub fn teardown_delay(&self) -> Duration {
        Duration::from_millis(self.plugins.teardown_delay_ms)
    }

    pub fn console_group(&self) -> Option<String> {
        self.adapters.console.as_ref().and_then(|c| c.group_id.clone())
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}
