//! Publish specification parsing.
//!
//! A package declares what it wants published as a mapping from an encoded
//! key to an options value. The key carries the source path relative to the
//! package's install root and may carry an explicit target override:
//! `"templates/views"` or `"templates/views:resources/views"`. The value is
//! either a bare mode string (`"replace"`) or a structured object
//! (`{"mode": "merge", "type": "config", "target": "config/app"}`).

use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Kind reported to the handler when the declaration does not name one.
pub const DEFAULT_KIND: &str = "file";

#[derive(Debug, Error, PartialEq)]
pub enum SpecError {
    #[error("malformed publish spec: {0}")]
    Malformed(String),

    #[error("unsupported publish mode `{0}`")]
    UnsupportedMode(String),
}

/// How source content is placed at the target. Closed set; anything else in
/// a declaration is rejected at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Copy,
    Replace,
    Merge,
}

impl FromStr for Mode {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "copy" => Ok(Mode::Copy),
            "replace" => Ok(Mode::Replace),
            "merge" => Ok(Mode::Merge),
            other => Err(SpecError::UnsupportedMode(other.to_string())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Copy => write!(f, "copy"),
            Mode::Replace => write!(f, "replace"),
            Mode::Merge => write!(f, "merge"),
        }
    }
}

/// The declaration value for one publish entry.
///
/// Declarations come from host-owned JSON, so the two accepted shapes are
/// modeled explicitly instead of inspecting value types at use sites.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Options {
    /// Bare mode string, e.g. `"replace"`.
    Mode(String),
    /// Structured form; `mode` defaults to `copy` when omitted.
    Detailed {
        mode: Option<String>,
        #[serde(rename = "type")]
        kind: Option<String>,
        target: Option<PathBuf>,
    },
}

impl Options {
    /// Decode a raw declaration value. Anything that is neither a string nor
    /// an object is malformed.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, SpecError> {
        serde_json::from_value(value.clone())
            .map_err(|_| SpecError::Malformed(format!("invalid options value `{}`", value)))
    }
}

/// One fully resolved publish entry, handed to the external handler as four
/// positional arguments: kind, target, source, mode.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishSpec {
    pub kind: String,
    pub target: PathBuf,
    pub source: PathBuf,
    pub mode: Mode,
}

/// Resolve one `(install_path, key, options)` triple into a [`PublishSpec`].
///
/// Pure: no filesystem access, no side effects. The source is joined onto
/// the package's install path. The target is taken from the options when
/// present, then from the key's `:target` suffix, and otherwise defaults to
/// the source-relative path itself (the handler applies its own destination
/// root to relative targets).
pub fn parse(install_path: &Path, key: &str, options: &Options) -> Result<PublishSpec, SpecError> {
    if install_path.as_os_str().is_empty() {
        return Err(SpecError::Malformed("install path cannot be empty".into()));
    }
    if key.is_empty() {
        return Err(SpecError::Malformed("publish key cannot be empty".into()));
    }

    let (source_rel, key_target) = match key.split_once(':') {
        Some((source, target)) => {
            if target.is_empty() {
                return Err(SpecError::Malformed(format!(
                    "target after `:` cannot be empty in `{}`",
                    key
                )));
            }
            (source, Some(target))
        }
        None => (key, None),
    };
    if source_rel.is_empty() {
        return Err(SpecError::Malformed(format!(
            "source before `:` cannot be empty in `{}`",
            key
        )));
    }

    let (mode_str, kind, options_target) = match options {
        Options::Mode(mode) => (Some(mode.as_str()), None, None),
        Options::Detailed { mode, kind, target } => {
            (mode.as_deref(), kind.as_deref(), target.as_deref())
        }
    };

    let mode = match mode_str {
        Some(s) => s.parse::<Mode>()?,
        None => Mode::default(),
    };

    // Options-supplied target wins over the key-encoded override.
    let target = options_target
        .map(Path::to_path_buf)
        .or_else(|| key_target.map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(source_rel));

    Ok(PublishSpec {
        kind: kind.unwrap_or(DEFAULT_KIND).to_string(),
        target,
        source: install_path.join(source_rel),
        mode,
    })
}
