//! External handler invocation.
//!
//! The handler command is an opaque capability supplied by the project. The
//! only obligations here are injection-safe argument construction (the four
//! values travel as separate argv entries, no shell ever sees them) and a
//! faithful relay of the exit status and captured streams.

use anyhow::{Context, Result};
use std::process::Command;

use super::PublishSpec;

/// Outcome of one handler run. Transient; only ever relayed to the console.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

#[cfg_attr(test, mockall::automock)]
pub trait Invoker {
    /// Run the handler for one publish entry, blocking until it exits.
    /// `Err` means the process could not be launched at all.
    fn invoke(&self, cmd: &str, spec: &PublishSpec) -> Result<Invocation>;
}

pub struct ProcessInvoker;

impl Invoker for ProcessInvoker {
    #[tracing::instrument(skip(self))]
    fn invoke(&self, cmd: &str, spec: &PublishSpec) -> Result<Invocation> {
        let output = Command::new(cmd)
            .arg(&spec.kind)
            .arg(&spec.target)
            .arg(&spec.source)
            .arg(spec.mode.to_string())
            .output()
            .with_context(|| format!("Failed to launch publish handler `{}`", cmd))?;

        Ok(Invocation {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Render the command line for one entry, for dry runs. Arguments are quoted
/// the way a shell would want them; execution itself never goes through one.
pub fn command_line(cmd: &str, spec: &PublishSpec) -> String {
    [
        cmd.to_string(),
        quote(&spec.kind),
        quote(&spec.target.display().to_string()),
        quote(&spec.source.display().to_string()),
        quote(&spec.mode.to_string()),
    ]
    .join(" ")
}

fn quote(arg: &str) -> String {
    format!("'{}'", arg.replace('\'', r"'\''"))
}
