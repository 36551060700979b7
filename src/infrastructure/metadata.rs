//! Host package metadata, taken from the crate manifest at build time

use serde::Serialize;

/// Release day of the current version
const UPDAY: &str = "2026-10-18";

#[derive(Debug, Clone, Serialize)]
pub struct PackageMetadata {
    pub name: String,
    pub version: String,
    pub upday: String,
    pub author: String,
    pub license: String,
    pub homepage: String,
}

impl PackageMetadata {
    pub fn current() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            upday: UPDAY.to_string(),
            author: env!("CARGO_PKG_AUTHORS").to_string(),
            license: env!("CARGO_PKG_LICENSE").to_string(),
            homepage: env!("CARGO_PKG_HOMEPAGE").to_string(),
        }
    }
}

impl Default for PackageMetadata {
    fn default() -> Self {
        Self::current()
    }
}
