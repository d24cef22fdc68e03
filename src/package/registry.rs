//! Package registry: enumeration of installed packages and install-path
//! resolution. Both belong to the host package manager; the trait is the
//! seam this component consumes them through.

use anyhow::{Context, Result};
use log::debug;
use std::path::PathBuf;

use crate::runtime::Runtime;

use super::{InstalledFile, InstalledPackage};

#[cfg_attr(test, mockall::automock)]
pub trait Registry {
    /// All installed packages, in the order the host installed them.
    fn packages(&self) -> Result<Vec<InstalledPackage>>;

    /// Filesystem root where the given package's files were placed.
    fn install_path(&self, package: &InstalledPackage) -> PathBuf;
}

/// Registry backed by the host's `installed.json` under the vendor dir.
pub struct JsonRegistry<'a, R: Runtime> {
    runtime: &'a R,
    installed_path: PathBuf,
    vendor_dir: PathBuf,
}

impl<'a, R: Runtime> JsonRegistry<'a, R> {
    pub fn new(runtime: &'a R, installed_path: PathBuf, vendor_dir: PathBuf) -> Self {
        Self {
            runtime,
            installed_path,
            vendor_dir,
        }
    }
}

impl<R: Runtime> Registry for JsonRegistry<'_, R> {
    #[tracing::instrument(skip(self))]
    fn packages(&self) -> Result<Vec<InstalledPackage>> {
        if !self.runtime.exists(&self.installed_path) {
            debug!("No installed registry at {:?}", self.installed_path);
            return Ok(Vec::new());
        }

        let content = self.runtime.read_to_string(&self.installed_path)?;
        let file: InstalledFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse installed registry {:?}", self.installed_path))?;

        debug!("Found {} installed package(s)", file.packages.len());
        Ok(file.packages)
    }

    fn install_path(&self, package: &InstalledPackage) -> PathBuf {
        // "owner/pkg" maps to <vendor>/owner/pkg
        package
            .name
            .split('/')
            .fold(self.vendor_dir.clone(), |path, part| path.join(part))
    }
}
