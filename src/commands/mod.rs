//! Publish hook commands.

mod list;
mod paths;
mod run;

pub use list::list;
pub use paths::{default_installed_path, default_manifest_path, default_vendor_dir, project_root};
pub use run::{RunOptions, run};
