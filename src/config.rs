//! Loads a static route table from a TOML or JSON file so the trie can be
//! built without a caller hand-writing `insert` calls. Grounded on
//! `config/mod.rs`'s `GatewayConfig::load` (file-exists check, extension
//! dispatch between `toml`/`serde_json`, default-on-missing, `tracing::info!`
//! on load) — trimmed to the one setting this crate has: the route list.

use std::path::Path;

use anyhow::{bail, Result};
use serde::Deserialize;

/// One row of a route table file.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteEntry {
    pub pattern: String,
    #[serde(default)]
    pub context: serde_json::Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RouteTableFile {
    #[serde(default)]
    pub routes: Vec<RouteEntry>,
}

impl RouteTableFile {
    /// Read `path` and parse it as a route table. A missing file yields an
    /// empty table rather than an error, matching the teacher's
    /// zero-configuration startup behavior.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("route file not found at {}, starting with no routes", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let table: RouteTableFile = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => toml::from_str(&content)?,
            Some("json") => serde_json::from_str(&content)?,
            Some(ext) => bail!("unsupported route file format: .{ext}, use .toml or .json"),
            None => bail!("route file has no extension, use .toml or .json"),
        };
        tracing::info!(count = table.routes.len(), "loaded route table from {}", path.display());
        Ok(table)
    }
}
