//! Infrastructure layer - External concerns
//! 
//! This layer contains:
//! - Config: Configuration loading
//! - Host: In-process plugin host
//! - Storage: Bot profile store
//! - Adapters: Platform integrations
//! - Metadata: Package metadata

pub mod config;
pub mod host;
pub mod storage;
pub mod adapters;
pub mod metadata;
