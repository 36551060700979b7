//! Shared fixtures: recording mock collaborators

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use carik_admin::application::errors::{BotError, HostError, ProfileError};
use carik_admin::application::services::{BatchRunner, NameLocks};
use carik_admin::domain::entities::PluginDescriptor;
use carik_admin::domain::traits::{Bot, BotInfo, BotProfile, GroupOption, GroupServiceSetting, GroupSetting, PluginHost};

static INIT: Once = Once::new();

pub fn ensure_init() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

pub fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

pub fn runner(timeout_ms: u64) -> BatchRunner {
    BatchRunner::new(Arc::new(NameLocks::new()), Duration::from_millis(timeout_ms))
}

#[derive(Default)]
struct HostState {
    universe: Vec<PluginDescriptor>,
    mounted: HashSet<String>,
    tearing_down: HashSet<String>,
    calls: Vec<String>,
    fail_mount: HashMap<String, String>,
    fail_unmount: HashMap<String, String>,
    fail_discovery: Option<String>,
    fail_mounted_set: Option<String>,
}

/// Plugin host that records every primitive call as `"<verb> <name>"`
#[derive(Clone, Default)]
pub struct MockHost {
    state: Arc<Mutex<HostState>>,
    mount_delay: Duration,
    teardown_delay: Duration,
}

impl MockHost {
    pub fn new(universe: Vec<PluginDescriptor>) -> Self {
        let host = Self::default();
        host.state.lock().unwrap().universe = universe;
        host
    }

    pub fn with_mounted(self, names: &[&str]) -> Self {
        self.state.lock().unwrap().mounted.extend(names.iter().map(|s| s.to_string()));
        self
    }

    pub fn failing_mount(self, name: &str, message: &str) -> Self {
        self.state.lock().unwrap().fail_mount.insert(name.to_string(), message.to_string());
        self
    }

    pub fn failing_unmount(self, name: &str, message: &str) -> Self {
        self.state.lock().unwrap().fail_unmount.insert(name.to_string(), message.to_string());
        self
    }

    pub fn failing_discovery(self, message: &str) -> Self {
        self.state.lock().unwrap().fail_discovery = Some(message.to_string());
        self
    }

    pub fn failing_mounted_set(self, message: &str) -> Self {
        self.state.lock().unwrap().fail_mounted_set = Some(message.to_string());
        self
    }

    pub fn with_mount_delay(mut self, ms: u64) -> Self {
        self.mount_delay = Duration::from_millis(ms);
        self
    }

    /// Unmount returns at once but teardown settles only after `ms`
    pub fn with_teardown(mut self, ms: u64) -> Self {
        self.teardown_delay = Duration::from_millis(ms);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == call).count()
    }

    pub fn is_mounted(&self, name: &str) -> bool {
        self.state.lock().unwrap().mounted.contains(name)
    }

    fn record(&self, call: String) {
        self.state.lock().unwrap().calls.push(call);
    }
}

#[async_trait]
impl PluginHost for MockHost {
    async fn discover_plugins(&self) -> Result<Vec<PluginDescriptor>, HostError> {
        let state = self.state.lock().unwrap();
        match &state.fail_discovery {
            Some(message) => Err(HostError::Discovery(message.clone())),
            None => Ok(state.universe.clone()),
        }
    }

    async fn mounted_names(&self) -> Result<HashSet<String>, HostError> {
        let state = self.state.lock().unwrap();
        match &state.fail_mounted_set {
            Some(message) => Err(HostError::Discovery(message.clone())),
            None => Ok(state.mounted.clone()),
        }
    }

    async fn mount(&self, descriptor: &PluginDescriptor) -> Result<(), HostError> {
        self.record(format!("mount {}", descriptor.name));
        if !self.mount_delay.is_zero() {
            tokio::time::sleep(self.mount_delay).await;
        }

        let mut state = self.state.lock().unwrap();
        if let Some(message) = state.fail_mount.get(&descriptor.name) {
            return Err(HostError::Primitive(message.clone()));
        }
        if state.tearing_down.contains(&descriptor.name) {
            return Err(HostError::Primitive(format!("{} is still tearing down", descriptor.name)));
        }
        if !state.mounted.insert(descriptor.name.clone()) {
            return Err(HostError::Primitive(format!("{} mounted twice", descriptor.name)));
        }
        Ok(())
    }

    async fn unmount(&self, name: &str) -> Result<(), HostError> {
        self.record(format!("unmount {}", name));

        {
            let mut state = self.state.lock().unwrap();
            if let Some(message) = state.fail_unmount.get(name) {
                return Err(HostError::Primitive(message.clone()));
            }
            if !state.mounted.remove(name) {
                return Err(HostError::Primitive(format!("{} unmounted twice", name)));
            }
            if self.teardown_delay.is_zero() {
                return Ok(());
            }
            state.tearing_down.insert(name.to_string());
        }

        let state = self.state.clone();
        let delay = self.teardown_delay;
        let name = name.to_string();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut state = state.lock().unwrap();
            state.tearing_down.remove(&name);
            state.calls.push(format!("settled {}", name));
        });
        Ok(())
    }

    async fn wait_unmounted(&self, name: &str) -> Result<(), HostError> {
        loop {
            if !self.state.lock().unwrap().tearing_down.contains(name) {
                return Ok(());
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }
}

#[derive(Default)]
struct ProfileState {
    enabled: Vec<String>,
    groups: BTreeMap<String, BTreeMap<String, bool>>,
    calls: Vec<String>,
    failures: HashMap<String, String>,
}

/// Bot profile that records calls as `"<verb> <name>"` or `"<group> <name> apply=<bool>"`
#[derive(Clone)]
pub struct MockProfile {
    uin: String,
    state: Arc<Mutex<ProfileState>>,
}

impl MockProfile {
    pub fn new(uin: &str) -> Self {
        Self {
            uin: uin.to_string(),
            state: Arc::new(Mutex::new(ProfileState::default())),
        }
    }

    /// Every call touching `name` fails with `message`
    pub fn failing(self, name: &str, message: &str) -> Self {
        self.state.lock().unwrap().failures.insert(name.to_string(), message.to_string());
        self
    }

    pub fn with_enabled(self, names: &[&str]) -> Self {
        self.state.lock().unwrap().enabled.extend(names.iter().map(|s| s.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    fn call(&self, call: String, name: &str) -> Result<(), ProfileError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        match state.failures.get(name) {
            Some(message) => Err(ProfileError::Rejected(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl BotProfile for MockProfile {
    fn uin(&self) -> &str {
        &self.uin
    }

    async fn enable_plugin(&self, name: &str) -> Result<(), ProfileError> {
        self.call(format!("enable {}", name), name)?;
        self.state.lock().unwrap().enabled.push(name.to_string());
        Ok(())
    }

    async fn disable_plugin(&self, name: &str) -> Result<(), ProfileError> {
        self.call(format!("disable {}", name), name)?;
        self.state.lock().unwrap().enabled.retain(|n| n != name);
        Ok(())
    }

    async fn update_group_option(&self, group_id: &str, name: &str, option: GroupOption) -> Result<(), ProfileError> {
        let GroupOption::Apply(apply) = option;
        self.call(format!("{} {} apply={}", group_id, name, apply), name)?;
        self.state
            .lock()
            .unwrap()
            .groups
            .entry(group_id.to_string())
            .or_default()
            .insert(name.to_string(), apply);
        Ok(())
    }

    async fn group_setting(&self, group_id: &str) -> Result<GroupSetting, ProfileError> {
        let state = self.state.lock().unwrap();
        let stored = state.groups.get(group_id);
        let setting = state
            .enabled
            .iter()
            .map(|name| {
                let apply = stored.and_then(|s| s.get(name).copied()).unwrap_or(true);
                (name.clone(), GroupServiceSetting { apply })
            })
            .collect();
        Ok(setting)
    }

    async fn enabled_plugins(&self) -> Result<Vec<String>, ProfileError> {
        let mut enabled = self.state.lock().unwrap().enabled.clone();
        enabled.sort();
        Ok(enabled)
    }

    async fn group_ids(&self) -> Result<Vec<String>, ProfileError> {
        Ok(self.state.lock().unwrap().groups.keys().cloned().collect())
    }
}

pub struct MockBot;

#[async_trait]
impl Bot for MockBot {
    async fn start(&self) -> Result<(), BotError> {
        Ok(())
    }

    async fn send_message(&self, _chat_id: &str, _text: &str) -> Result<String, BotError> {
        Ok("mock_msg".to_string())
    }

    fn bot_info(&self) -> BotInfo {
        BotInfo {
            id: "10001".to_string(),
            name: "carik-bot".to_string(),
            username: "carik_bot".to_string(),
        }
    }
}
