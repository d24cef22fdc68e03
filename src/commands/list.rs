//! List declared publish entries without invoking the handler.

use anyhow::Result;
use log::debug;

use crate::console::Console;
use crate::package::Registry;
use crate::publish::{self, Options};

/// Print every declared publish entry with its resolved source, target,
/// mode and kind. Malformed entries are reported inline, the same way the
/// publish pass would contain them.
#[tracing::instrument(skip(registry, console))]
pub fn list<R: Registry, C: Console>(registry: &R, console: &C) -> Result<()> {
    let packages = registry.packages()?;
    debug!("Listing publish entries for {} package(s)", packages.len());

    let mut total = 0usize;
    for package in &packages {
        let Some(declaration) = &package.publish else {
            continue;
        };
        let install_path = registry.install_path(package);

        for (key, value) in declaration {
            total += 1;
            let parsed = Options::from_value(value)
                .and_then(|options| publish::parse(&install_path, key, &options));
            match parsed {
                Ok(spec) => console.write(&format!(
                    "{}: {} -> {} ({}, {})",
                    package.name,
                    spec.source.display(),
                    spec.target.display(),
                    spec.mode,
                    spec.kind
                )),
                Err(e) => console.write_error(&format!("{}: `{}`: {}", package.name, key, e)),
            }
        }
    }

    if total == 0 {
        console.write("No publish entries declared.");
    }
    Ok(())
}
