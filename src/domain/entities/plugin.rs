//! Plugin identity, scope states and lifecycle transitions

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::application::errors::TransitionError;

/// Where a discovered plugin package lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PluginOrigin {
    /// Project-local plugin directory
    Local,
    /// Installed dependency package
    Dependency,
}

impl PluginOrigin {
    pub fn as_str(&self) -> &str {
        match self {
            PluginOrigin::Local => "local",
            PluginOrigin::Dependency => "dependency",
        }
    }
}

/// Discovery-time identity of a plugin package
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct PluginDescriptor {
    /// Unique within the discovery universe
    pub name: String,
    /// Directory or package name the plugin was found under
    pub folder: String,
    pub origin: PluginOrigin,
}

impl PluginDescriptor {
    pub fn new(name: impl Into<String>, folder: impl Into<String>, origin: PluginOrigin) -> Self {
        Self {
            name: name.into(),
            folder: folder.into(),
            origin,
        }
    }

    pub fn local(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::new(name.clone(), name, PluginOrigin::Local)
    }

    /// First descriptor in discovery order whose name matches
    pub fn find<'a>(universe: &'a [PluginDescriptor], name: &str) -> Option<&'a PluginDescriptor> {
        universe.iter().find(|d| d.name == name)
    }
}

/// Discovered plugins split by origin, each bucket listing folders in discovery order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PluginCatalog {
    pub local: Vec<String>,
    pub dependency: Vec<String>,
}

impl PluginCatalog {
    pub fn from_descriptors(descriptors: &[PluginDescriptor]) -> Self {
        let mut catalog = Self::default();
        for descriptor in descriptors {
            match descriptor.origin {
                PluginOrigin::Local => catalog.local.push(descriptor.folder.clone()),
                PluginOrigin::Dependency => catalog.dependency.push(descriptor.folder.clone()),
            }
        }
        catalog
    }

    pub fn is_empty(&self) -> bool {
        self.local.is_empty() && self.dependency.is_empty()
    }
}

/// Where a plugin currently sits in the scope narrowing
/// `Unknown → Discovered → Mounted → Enabled → Applied`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginState {
    Unknown,
    Discovered,
    Mounted,
    Enabled,
    Applied,
    /// Mounted but absent from discovery, a violation of the narrowing
    Orphaned,
}

impl PluginState {
    /// Global-scope state from a fresh discovery lookup and mounted-set read
    pub fn observe(discovered: bool, mounted: bool) -> Self {
        match (discovered, mounted) {
            (false, false) => PluginState::Unknown,
            (true, false) => PluginState::Discovered,
            (true, true) => PluginState::Mounted,
            (false, true) => PluginState::Orphaned,
        }
    }

    pub fn is_mounted(&self) -> bool {
        !matches!(self, PluginState::Unknown | PluginState::Discovered)
    }

    pub fn as_str(&self) -> &str {
        match self {
            PluginState::Unknown => "unknown",
            PluginState::Discovered => "discovered",
            PluginState::Mounted => "mounted",
            PluginState::Enabled => "enabled",
            PluginState::Applied => "applied",
            PluginState::Orphaned => "orphaned",
        }
    }
}

impl fmt::Display for PluginState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A lifecycle or scope verb applied to one plugin name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    Mount,
    Unmount,
    Reload,
    Enable,
    Disable,
    Apply,
    Exempt,
}

impl Transition {
    pub fn as_str(&self) -> &str {
        match self {
            Transition::Mount => "mount",
            Transition::Unmount => "unmount",
            Transition::Reload => "reload",
            Transition::Enable => "enable",
            Transition::Disable => "disable",
            Transition::Apply => "apply",
            Transition::Exempt => "exempt",
        }
    }

    fn message_prefix(&self) -> &str {
        match self {
            Transition::Mount => "plugin mount",
            Transition::Unmount => "plugin unmount",
            Transition::Reload => "plugin reload",
            Transition::Enable => "plugin enable",
            Transition::Disable => "plugin disable",
            Transition::Apply => "group server apply",
            Transition::Exempt => "group server exempt",
        }
    }

    /// State the plugin is in once the transition succeeds
    pub fn target(&self) -> PluginState {
        match self {
            Transition::Mount | Transition::Reload | Transition::Disable => PluginState::Mounted,
            Transition::Unmount => PluginState::Discovered,
            Transition::Enable | Transition::Exempt => PluginState::Enabled,
            Transition::Apply => PluginState::Applied,
        }
    }

    /// Checks a global-scope state against this transition.
    ///
    /// Scope verbs carry no local precondition: the bot profile rejects them.
    pub fn precondition(&self, state: PluginState) -> Result<(), TransitionError> {
        match self {
            Transition::Mount => match state {
                PluginState::Unknown | PluginState::Orphaned => Err(TransitionError::NotFound),
                PluginState::Discovered => Ok(()),
                _ => Err(TransitionError::AlreadyMounted),
            },
            Transition::Unmount => {
                if state.is_mounted() {
                    Ok(())
                } else {
                    Err(TransitionError::NotMounted)
                }
            }
            Transition::Reload => match state {
                PluginState::Unknown | PluginState::Discovered => Err(TransitionError::NotMounted),
                PluginState::Orphaned => Err(TransitionError::NotFound),
                _ => Ok(()),
            },
            Transition::Enable | Transition::Disable | Transition::Apply | Transition::Exempt => Ok(()),
        }
    }

    /// Reply message for the outcome of this transition on one name
    pub fn describe(&self, result: &Result<(), TransitionError>) -> String {
        match result {
            Ok(()) => format!("{} success", self.message_prefix()),
            Err(e @ (TransitionError::Collaborator(_) | TransitionError::Timeout)) => {
                format!("{} failure, {}", self.message_prefix(), e)
            }
            Err(e) => e.to_string(),
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
