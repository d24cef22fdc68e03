//! Project-level publish configuration.

use anyhow::{Context, Result};
use log::debug;
use serde::Deserialize;
use std::path::Path;

use crate::runtime::Runtime;

/// Project manifest carrying the publish handler configuration. Publishing
/// is opt-in per project: a missing manifest file and a missing `publish-cmd`
/// key both mean there is nothing to do.
#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Manifest {
    #[serde(rename = "publish-cmd", default)]
    pub publish_cmd: Option<String>,
}

impl Manifest {
    #[tracing::instrument(skip(runtime))]
    pub fn load_or_default<R: Runtime>(runtime: &R, path: &Path) -> Result<Self> {
        if !runtime.exists(path) {
            debug!("No project manifest at {:?}", path);
            return Ok(Manifest::default());
        }

        let content = runtime.read_to_string(path)?;
        let manifest: Manifest = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse project manifest {:?}", path))?;
        Ok(manifest)
    }

    /// The configured handler command, with blank values treated as absent.
    pub fn handler(&self) -> Option<&str> {
        self.publish_cmd.as_deref().map(str::trim).filter(|cmd| !cmd.is_empty())
    }
}
