//! Installed-package metadata owned by the host package manager.
//!
//! The host writes an installed-package registry after every install; this
//! component only reads it. Publish declarations are carried verbatim as
//! JSON values and decoded per entry by the spec parser.

mod registry;

use serde::Deserialize;

pub use registry::{JsonRegistry, Registry};

#[cfg(test)]
pub use registry::MockRegistry;

/// A package's publish declaration: encoded entry keys mapped to raw options
/// values, in declaration order (serde_json's `preserve_order` keeps the
/// underlying map insertion-ordered).
pub type PublishDeclaration = serde_json::Map<String, serde_json::Value>;

/// One installed package as recorded by the host.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct InstalledPackage {
    /// Package name in `owner/pkg` form.
    pub name: String,
    /// Publish declaration from the package's own metadata, if any.
    #[serde(default)]
    pub publish: Option<PublishDeclaration>,
}

/// On-disk shape of the installed-package registry file.
#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
pub struct InstalledFile {
    #[serde(default)]
    pub packages: Vec<InstalledPackage>,
}
