//! Application services - Business logic orchestration

pub mod batch;
pub mod command_service;
pub mod lifecycle;
pub mod scope;

pub use batch::{BatchRunner, NameLocks};
pub use command_service::CommandService;
pub use lifecycle::PluginLifecycleManager;
pub use scope::ScopeBindingManager;
