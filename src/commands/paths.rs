use anyhow::Result;
use log::debug;
use std::path::{Path, PathBuf};

use crate::runtime::Runtime;

/// Project manifest file name, relative to the project root.
pub const MANIFEST_FILE: &str = "publish.json";

/// Installed-package registry file name, relative to the vendor dir.
pub const INSTALLED_FILE: &str = "installed.json";

/// Directory the host installs packages under, relative to the project root.
pub const VENDOR_DIR: &str = "vendor";

/// Resolve the project root: an explicit path wins, otherwise the current
/// working directory (the host fires the hook from the project root).
#[tracing::instrument(skip(runtime))]
pub fn project_root<R: Runtime>(runtime: &R, project: Option<PathBuf>) -> Result<PathBuf> {
    let root = match project {
        Some(path) => path,
        None => runtime.current_dir()?,
    };
    debug!("Using project root: {}", root.display());
    Ok(root)
}

pub fn default_manifest_path(project: &Path) -> PathBuf {
    project.join(MANIFEST_FILE)
}

pub fn default_vendor_dir(project: &Path) -> PathBuf {
    project.join(VENDOR_DIR)
}

pub fn default_installed_path(project: &Path) -> PathBuf {
    default_vendor_dir(project).join(INSTALLED_FILE)
}
