//! carik-admin - plugin lifecycle and group service administration
//!
//! Operators manage plugins through chat commands. The
//! [`PluginLifecycleManager`](application::services::PluginLifecycleManager)
//! mounts, unmounts and reloads plugins on the host; the
//! [`ScopeBindingManager`](application::services::ScopeBindingManager)
//! enables them per bot and applies them per group.

pub mod domain;
pub mod application;
pub mod infrastructure;
