//! Domain layer - Core business objects and collaborator abstractions
//!
//! This layer contains:
//! - Entities: Plugin descriptors, transitions, batch reports, messages, commands
//! - Traits: Abstractions for infrastructure (PluginHost, BotProfile, Bot)

pub mod entities;
pub mod traits;
