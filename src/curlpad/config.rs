use crate::error::{CurlpadError, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.json";
const CONFIG_DIR_ENV: &str = "CURLPAD_CONFIG_DIR";

/// User preferences, stored in `<config dir>/config.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CurlpadConfig {
    /// Editor command or path. Auto-detected (nvim, then vim) when unset.
    #[serde(default)]
    pub editor: Option<String>,

    /// Compact `-d '{...}'` payloads through jq before validation
    #[serde(default = "default_true")]
    pub format_json: bool,

    /// Ask before running the extracted commands
    #[serde(default = "default_true")]
    pub confirm: bool,

    /// Open the editor in insert mode
    #[serde(default = "default_true")]
    pub cursor_insert: bool,
}

fn default_true() -> bool {
    true
}

impl Default for CurlpadConfig {
    fn default() -> Self {
        Self {
            editor: None,
            format_json: true,
            confirm: true,
            cursor_insert: true,
        }
    }
}

impl CurlpadConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(CurlpadError::Io)?;
        let config: CurlpadConfig =
            serde_json::from_str(&content).map_err(CurlpadError::Config)?;
        Ok(config)
    }

    /// Load config from [`config_dir`], falling back to defaults when no directory
    /// can be determined.
    pub fn load_default() -> Result<Self> {
        match config_dir() {
            Some(dir) => Self::load(dir),
            None => Ok(Self::default()),
        }
    }
}

/// `$CURLPAD_CONFIG_DIR`, else the platform config directory.
pub fn config_dir() -> Option<PathBuf> {
    if let Ok(dir) = env::var(CONFIG_DIR_ENV) {
        if !dir.is_empty() {
            return Some(PathBuf::from(dir));
        }
    }
    ProjectDirs::from("com", "curlpad", "curlpad").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Everything a single run needs to know, passed explicitly to each stage.
#[derive(Debug, Clone, Default)]
pub struct RunContext {
    pub debug: bool,
    pub assume_yes: bool,
    pub base_url: Option<String>,
    pub config: CurlpadConfig,
}

impl RunContext {
    pub fn new(config: CurlpadConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_assume_yes(mut self, yes: bool) -> Self {
        self.assume_yes = yes;
        self
    }

    pub fn with_base_url(mut self, url: Option<String>) -> Self {
        self.base_url = url.filter(|u| !u.trim().is_empty());
        self
    }

    /// Whether the run should stop and ask before executing anything.
    pub fn should_confirm(&self) -> bool {
        self.config.confirm && !self.assume_yes
    }
}
