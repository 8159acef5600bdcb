//! Locating the external tools curlpad drives: `curl` (required), `nvim` or `vim`
//! (one required) and `jq` (optional), plus the `--install` helper.

use crate::config::CurlpadConfig;
use crate::error::{CurlpadError, Result};
use log::debug;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Command;

const INSTALL_PACKAGES: [&str; 2] = ["vim", "jq"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorKind {
    Nvim,
    Vim,
}

impl EditorKind {
    /// Classifies an editor binary by its file name.
    pub fn from_path(path: &Path) -> Self {
        let is_nvim = path
            .file_name()
            .and_then(OsStr::to_str)
            .map(|name| name.starts_with("nvim"))
            .unwrap_or(false);
        if is_nvim {
            EditorKind::Nvim
        } else {
            EditorKind::Vim
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Editor {
    pub path: PathBuf,
    pub kind: EditorKind,
}

impl Editor {
    pub fn new(path: PathBuf) -> Self {
        let kind = EditorKind::from_path(&path);
        Self { path, kind }
    }
}

/// Resolved paths of every tool a run needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    pub curl: PathBuf,
    pub editor: Editor,
    pub jq: Option<PathBuf>,
}

impl Toolchain {
    /// Detects the toolchain on the process PATH.
    pub fn detect(config: &CurlpadConfig) -> Result<Self> {
        Self::detect_with(config, locate)
    }

    /// Detects the toolchain against an explicit PATH value.
    pub fn detect_in<P: AsRef<OsStr>>(config: &CurlpadConfig, path: P) -> Result<Self> {
        let path = path.as_ref();
        Self::detect_with(config, |name| locate_in(name, path))
    }

    fn detect_with<F>(config: &CurlpadConfig, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<PathBuf>,
    {
        let curl = lookup("curl").ok_or_else(|| {
            CurlpadError::MissingDependency(
                "curl is not installed. Please install curl first.".to_string(),
            )
        })?;

        let editor = match config.editor.as_deref() {
            Some(preferred) => lookup(preferred).map(Editor::new).ok_or_else(|| {
                CurlpadError::MissingDependency(format!(
                    "Configured editor '{}' was not found.",
                    preferred
                ))
            })?,
            None => lookup("nvim")
                .or_else(|| lookup("vim"))
                .map(Editor::new)
                .ok_or_else(|| {
                    CurlpadError::MissingDependency(
                        "Neither nvim nor vim is installed.\nRun 'curlpad --install' to install dependencies."
                            .to_string(),
                    )
                })?,
        };
        debug!("Selected editor: {} ({:?})", editor.path.display(), editor.kind);

        let jq = lookup("jq");
        if jq.is_none() {
            debug!("jq not found; JSON payloads will not be formatted");
        }

        Ok(Self { curl, editor, jq })
    }
}

/// Looks a binary up on PATH.
pub fn locate(name: &str) -> Option<PathBuf> {
    let found = which::which(name).ok();
    log_lookup(name, found.as_deref());
    found
}

/// Looks a binary up on the given PATH value instead of the process one.
pub fn locate_in(name: &str, path: &OsStr) -> Option<PathBuf> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let found = which::which_in(name, Some(path), cwd).ok();
    log_lookup(name, found.as_deref());
    found
}

fn log_lookup(name: &str, found: Option<&Path>) {
    match found {
        Some(path) => debug!("Check command '{}': found at {}", name, path.display()),
        None => debug!("Check command '{}': not found", name),
    }
}

/// Builds the package manager invocations that install vim and jq on `os`.
/// `available` reports whether a package manager binary exists.
pub fn install_plan<F>(os: &str, available: F) -> Result<Vec<Vec<String>>>
where
    F: Fn(&str) -> bool,
{
    let cmd = |parts: &[&str]| -> Vec<String> {
        parts
            .iter()
            .copied()
            .chain(INSTALL_PACKAGES)
            .map(str::to_string)
            .collect()
    };

    match os {
        "linux" => {
            if available("apt-get") {
                Ok(vec![
                    vec!["sudo".into(), "apt-get".into(), "update".into()],
                    cmd(&["sudo", "apt-get", "install", "-y"]),
                ])
            } else if available("dnf") {
                Ok(vec![cmd(&["sudo", "dnf", "install", "-y"])])
            } else if available("yum") {
                Ok(vec![cmd(&["sudo", "yum", "install", "-y"])])
            } else {
                Err(CurlpadError::Install(
                    "Cannot auto-install: unsupported package manager.\n\
                     Please install vim and jq manually:\n  \
                     Ubuntu/Debian: sudo apt install vim jq\n  \
                     RHEL/CentOS: sudo yum install vim jq"
                        .to_string(),
                ))
            }
        }
        "macos" => {
            if available("brew") {
                Ok(vec![cmd(&["brew", "install"])])
            } else {
                Err(CurlpadError::Install(
                    "Cannot auto-install: Homebrew not found.\n\
                     Please install Homebrew and run: brew install vim jq"
                        .to_string(),
                ))
            }
        }
        other => Err(CurlpadError::Install(format!(
            "Unsupported platform: {}",
            other
        ))),
    }
}

/// Installs vim and jq with the platform package manager, streaming its output.
pub fn install_dependencies() -> Result<()> {
    let os = std::env::consts::OS;
    debug!("Detected platform: {}", os);
    let plan = install_plan(os, |name| locate(name).is_some())?;

    for step in plan {
        let Some((program, args)) = step.split_first() else {
            continue;
        };
        debug!("Running installer: {}", step.join(" "));
        let status = Command::new(program)
            .args(args)
            .status()
            .map_err(|e| CurlpadError::Install(format!("Failed to run '{}': {}", program, e)))?;
        if !status.success() {
            return Err(CurlpadError::Install(format!(
                "'{}' failed with {}",
                step.join(" "),
                status
            )));
        }
    }
    Ok(())
}
