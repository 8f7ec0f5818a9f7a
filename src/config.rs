//! Project configuration for the hook tooling.
//!
//! Settings come from three layers, later ones winning:
//!
//! 1. `.git-common-hooks.toml` at the repository root (optional)
//! 2. environment (`GIT_COMMON_HOOKS_DIR`)
//! 3. command-line flags
//!
//! # Configuration File Format
//!
//! ```toml
//! [hooks]
//! directory = "tools/hooks"
//! lfs_config_key = "hooks.requireLfs"
//! ```

use crate::errors::{HooksError, Result};
use crate::repo::RepoLocation;
use crate::templates::DEFAULT_LFS_CONFIG_KEY;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// File name of the optional project configuration.
pub const CONFIG_FILE: &str = ".git-common-hooks.toml";

/// Environment variable overriding the hooks directory.
pub const DIR_ENV_VAR: &str = "GIT_COMMON_HOOKS_DIR";

/// `[hooks]` table.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct HooksSection {
    /// Hooks directory, relative to the repository root or absolute
    #[serde(default)]
    pub directory: Option<PathBuf>,
    /// `git config` key that enables the Git LFS guard
    #[serde(default)]
    pub lfs_config_key: Option<String>,
}

/// The complete configuration file.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct HooksToml {
    #[serde(default)]
    pub hooks: HooksSection,
}

impl HooksToml {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(HooksError::io("read", path))?;
        Self::parse(&content).map_err(|source| HooksError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load `.git-common-hooks.toml` from the repository root.
    /// Returns the default configuration if the file doesn't exist.
    pub fn load_or_default(root: &Path) -> Result<Self> {
        let config_path = root.join(CONFIG_FILE);
        if config_path.exists() {
            tracing::debug!(path = %config_path.display(), "loading config file");
            Self::load(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Get the `git config` key for the LFS guard, falling back to the default.
    pub fn lfs_config_key(&self) -> String {
        self.hooks
            .lfs_config_key
            .clone()
            .unwrap_or_else(|| DEFAULT_LFS_CONFIG_KEY.to_string())
    }

    /// Resolve the hooks directory for `repo`.
    ///
    /// `cli_dir` comes from `--directory` and is expected to be absolute
    /// already (the CLI resolves it against the working directory). File and
    /// environment values are taken relative to the repository root.
    pub fn hooks_dir(&self, repo: &RepoLocation, cli_dir: Option<&Path>) -> PathBuf {
        if let Some(dir) = cli_dir {
            return dir.to_path_buf();
        }
        let configured = std::env::var_os(DIR_ENV_VAR)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .or_else(|| self.hooks.directory.clone());
        match configured {
            Some(dir) => repo.root.join(dir),
            None => repo.default_hooks_dir(),
        }
    }
}
