//! The publish pass: enumerate installed packages, parse each declared
//! entry, invoke the external handler, report the outcome.

use anyhow::Result;
use log::debug;
use serde_json::Value;
use std::path::Path;

use crate::console::Console;
use crate::manifest::Manifest;
use crate::package::Registry;
use crate::publish::{self, Invoker, Options, command_line};

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Print handler command lines instead of executing them.
    pub dry_run: bool,
}

/// Run the publish pass once, to completion.
///
/// A missing handler configuration is a soft no-op: publishing is opt-in per
/// project. Every per-entry failure (malformed spec, unsupported mode,
/// unlaunchable handler, non-zero exit) is reported on the error stream and
/// the pass moves on to the next entry; one bad entry never aborts the pass.
#[tracing::instrument(skip(registry, invoker, console, manifest))]
pub fn run<R: Registry, I: Invoker, C: Console>(
    registry: &R,
    invoker: &I,
    console: &C,
    manifest: &Manifest,
    options: &RunOptions,
) -> Result<()> {
    let Some(cmd) = manifest.handler() else {
        console.write_error("missing `publish-cmd` handler, nothing to publish");
        return Ok(());
    };

    console.write(&format!("Publishing package files using `{}`", cmd));

    for package in registry.packages()? {
        let Some(declaration) = &package.publish else {
            debug!("Package {} declares nothing to publish", package.name);
            continue;
        };

        let install_path = registry.install_path(&package);
        debug!(
            "Publishing {} entry(ies) for {} from {}",
            declaration.len(),
            package.name,
            install_path.display()
        );

        for (key, value) in declaration {
            if let Err(e) = publish_entry(invoker, console, cmd, &install_path, key, value, options)
            {
                console.write_error(&format!("{}: `{}`: {:#}", package.name, key, e));
            }
        }
    }

    Ok(())
}

fn publish_entry<I: Invoker, C: Console>(
    invoker: &I,
    console: &C,
    cmd: &str,
    install_path: &Path,
    key: &str,
    value: &Value,
    options: &RunOptions,
) -> Result<()> {
    let entry_options = Options::from_value(value)?;
    let spec = publish::parse(install_path, key, &entry_options)?;

    if options.dry_run {
        console.write(&command_line(cmd, &spec));
        return Ok(());
    }

    let invocation = invoker.invoke(cmd, &spec)?;
    if !invocation.success {
        console.write_error(invocation.stderr.trim_end());
        return Ok(());
    }

    if console.is_verbose() && !invocation.stdout.is_empty() {
        console.write(invocation.stdout.trim_end());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::MockConsole;
    use crate::package::{InstalledPackage, MockRegistry, PublishDeclaration};
    use crate::publish::{Invocation, MockInvoker, Mode};
    use mockall::predicate;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    fn declaration(json: serde_json::Value) -> PublishDeclaration {
        json.as_object().unwrap().clone()
    }

    fn package(name: &str, publish: Option<PublishDeclaration>) -> InstalledPackage {
        InstalledPackage {
            name: name.to_string(),
            publish,
        }
    }

    fn manifest_with_handler() -> Manifest {
        Manifest {
            publish_cmd: Some("bin/publish".to_string()),
        }
    }

    fn ok_invocation() -> Invocation {
        Invocation {
            success: true,
            stdout: String::new(),
            stderr: String::new(),
        }
    }

    #[test]
    fn test_missing_handler_warns_once_and_invokes_nothing() {
        let mut registry = MockRegistry::new();
        registry.expect_packages().never();
        let mut invoker = MockInvoker::new();
        invoker.expect_invoke().never();

        let mut console = MockConsole::new();
        console.expect_write().never();
        console
            .expect_write_error()
            .with(predicate::str::contains("publish-cmd"))
            .times(1)
            .return_const(());

        run(&registry, &invoker, &console, &Manifest::default(), &RunOptions::default()).unwrap();
    }

    #[test]
    fn test_blank_handler_is_treated_as_missing() {
        let mut registry = MockRegistry::new();
        registry.expect_packages().never();
        let invoker = MockInvoker::new();

        let mut console = MockConsole::new();
        console.expect_write_error().times(1).return_const(());

        let manifest = Manifest {
            publish_cmd: Some("  ".to_string()),
        };
        run(&registry, &invoker, &console, &manifest, &RunOptions::default()).unwrap();
    }

    #[test]
    fn test_invokes_handler_once_per_declared_entry() {
        // Two packages; only the first declares anything
        let packages = vec![
            package(
                "acme/pkg",
                Some(declaration(serde_json::json!({
                    "templates/views": "replace",
                    "config/app.json:config/acme.json": {"mode": "merge", "type": "config"},
                }))),
            ),
            package("acme/silent", None),
        ];

        let mut registry = MockRegistry::new();
        registry
            .expect_packages()
            .returning(move || Ok(packages.clone()));
        registry
            .expect_install_path()
            .returning(|_| PathBuf::from("/vendor/acme/pkg"));

        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_by_invoker = Arc::clone(&seen);
        let mut invoker = MockInvoker::new();
        invoker
            .expect_invoke()
            .withf(|cmd, _| cmd == "bin/publish")
            .times(2)
            .returning(move |_, spec| {
                seen_by_invoker.lock().unwrap().push(spec.clone());
                Ok(ok_invocation())
            });

        let mut console = MockConsole::new();
        console
            .expect_write()
            .with(predicate::str::contains("bin/publish"))
            .times(1)
            .return_const(());
        console.expect_write_error().never();
        console.expect_is_verbose().return_const(false);

        run(&registry, &invoker, &console, &manifest_with_handler(), &RunOptions::default())
            .unwrap();

        // Entries run in declaration order with fully resolved specs
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].source, PathBuf::from("/vendor/acme/pkg/templates/views"));
        assert_eq!(seen[0].target, PathBuf::from("templates/views"));
        assert_eq!(seen[0].mode, Mode::Replace);
        assert_eq!(seen[1].source, PathBuf::from("/vendor/acme/pkg/config/app.json"));
        assert_eq!(seen[1].target, PathBuf::from("config/acme.json"));
        assert_eq!(seen[1].mode, Mode::Merge);
        assert_eq!(seen[1].kind, "config");
    }

    #[test]
    fn test_failing_entry_is_reported_and_pass_continues() {
        let packages = vec![package(
            "acme/pkg",
            Some(declaration(serde_json::json!({
                "first": "copy",
                "second": "copy",
            }))),
        )];

        let mut registry = MockRegistry::new();
        registry
            .expect_packages()
            .returning(move || Ok(packages.clone()));
        registry
            .expect_install_path()
            .returning(|_| PathBuf::from("/vendor/acme/pkg"));

        let mut invoker = MockInvoker::new();
        invoker.expect_invoke().times(2).returning(|_, spec| {
            if spec.source.ends_with("first") {
                Ok(Invocation {
                    success: false,
                    stdout: String::new(),
                    stderr: "permission denied\n".to_string(),
                })
            } else {
                Ok(ok_invocation())
            }
        });

        let mut console = MockConsole::new();
        console.expect_write().times(1).return_const(());
        console
            .expect_write_error()
            .with(predicate::eq("permission denied"))
            .times(1)
            .return_const(());
        console.expect_is_verbose().return_const(false);

        run(&registry, &invoker, &console, &manifest_with_handler(), &RunOptions::default())
            .unwrap();
    }

    #[test]
    fn test_unsupported_mode_is_contained_per_entry() {
        let packages = vec![package(
            "acme/pkg",
            Some(declaration(serde_json::json!({
                "broken": "explode",
                "fine": "copy",
            }))),
        )];

        let mut registry = MockRegistry::new();
        registry
            .expect_packages()
            .returning(move || Ok(packages.clone()));
        registry
            .expect_install_path()
            .returning(|_| PathBuf::from("/vendor/acme/pkg"));

        // Only the valid entry reaches the handler
        let mut invoker = MockInvoker::new();
        invoker
            .expect_invoke()
            .withf(|_, spec| spec.source.ends_with("fine"))
            .times(1)
            .returning(|_, _| Ok(ok_invocation()));

        let mut console = MockConsole::new();
        console.expect_write().times(1).return_const(());
        console
            .expect_write_error()
            .with(predicate::str::contains("unsupported publish mode `explode`"))
            .times(1)
            .return_const(());
        console.expect_is_verbose().return_const(false);

        run(&registry, &invoker, &console, &manifest_with_handler(), &RunOptions::default())
            .unwrap();
    }

    #[test]
    fn test_launch_failure_is_contained_per_entry() {
        let packages = vec![package(
            "acme/pkg",
            Some(declaration(serde_json::json!({
                "first": "copy",
                "second": "copy",
            }))),
        )];

        let mut registry = MockRegistry::new();
        registry
            .expect_packages()
            .returning(move || Ok(packages.clone()));
        registry
            .expect_install_path()
            .returning(|_| PathBuf::from("/vendor/acme/pkg"));

        let mut invoker = MockInvoker::new();
        invoker
            .expect_invoke()
            .times(2)
            .returning(|_, _| Err(anyhow::anyhow!("Failed to launch publish handler `bin/publish`")));

        let mut console = MockConsole::new();
        console.expect_write().times(1).return_const(());
        console
            .expect_write_error()
            .with(predicate::str::contains("Failed to launch publish handler"))
            .times(2)
            .return_const(());

        run(&registry, &invoker, &console, &manifest_with_handler(), &RunOptions::default())
            .unwrap();
    }

    #[test]
    fn test_verbose_relays_handler_stdout() {
        let packages = vec![package(
            "acme/pkg",
            Some(declaration(serde_json::json!({"templates": "copy"}))),
        )];

        let mut registry = MockRegistry::new();
        registry
            .expect_packages()
            .returning(move || Ok(packages.clone()));
        registry
            .expect_install_path()
            .returning(|_| PathBuf::from("/vendor/acme/pkg"));

        let mut invoker = MockInvoker::new();
        invoker.expect_invoke().times(1).returning(|_, _| {
            Ok(Invocation {
                success: true,
                stdout: "published templates\n".to_string(),
                stderr: String::new(),
            })
        });

        let mut console = MockConsole::new();
        console.expect_is_verbose().return_const(true);
        console
            .expect_write()
            .with(predicate::str::contains("bin/publish"))
            .times(1)
            .return_const(());
        console
            .expect_write()
            .with(predicate::eq("published templates"))
            .times(1)
            .return_const(());
        console.expect_write_error().never();

        run(&registry, &invoker, &console, &manifest_with_handler(), &RunOptions::default())
            .unwrap();
    }

    #[test]
    fn test_dry_run_prints_command_lines_without_invoking() {
        let packages = vec![package(
            "acme/pkg",
            Some(declaration(serde_json::json!({"templates/views": "replace"}))),
        )];

        let mut registry = MockRegistry::new();
        registry
            .expect_packages()
            .returning(move || Ok(packages.clone()));
        registry
            .expect_install_path()
            .returning(|_| PathBuf::from("/vendor/acme/pkg"));

        let mut invoker = MockInvoker::new();
        invoker.expect_invoke().never();

        let mut console = MockConsole::new();
        console
            .expect_write()
            .with(predicate::str::contains("Publishing package files"))
            .times(1)
            .return_const(());
        console
            .expect_write()
            .with(predicate::eq(
                "bin/publish 'file' 'templates/views' '/vendor/acme/pkg/templates/views' 'replace'",
            ))
            .times(1)
            .return_const(());
        console.expect_write_error().never();

        run(
            &registry,
            &invoker,
            &console,
            &manifest_with_handler(),
            &RunOptions { dry_run: true },
        )
        .unwrap();
    }
}
