//! Domain traits - Abstractions for infrastructure implementations

pub mod bot;
pub mod host;
pub mod profile;

pub use bot::{Bot, BotInfo};
pub use host::PluginHost;
pub use profile::{BotProfile, GroupOption, GroupServiceSetting, GroupSetting};
