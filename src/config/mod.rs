//! Repository settings.
//!
//! Settings are read from an optional `.wtm.toml` in the repository root.
//! Every key is optional; a missing, blank or invalid file falls back to
//! defaults with a warning for the invalid case.
//!
//! ```toml
//! worktrees-dir = "~/worktrees"   # where `add` places new worktrees
//! default-remote = "upstream"     # remote used by `reset`
//! run-hooks = false               # same as passing --no-hooks everywhere
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Name of the settings file in the repository root
pub const CONFIG_FILE_NAME: &str = ".wtm.toml";

const DEFAULT_REMOTE: &str = "origin";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct WtmConfig {
    /// Base directory for new worktrees; `~` expands to the home directory
    #[serde(default)]
    pub worktrees_dir: Option<String>,

    /// Remote that `reset` fetches from
    #[serde(default)]
    pub default_remote: Option<String>,

    /// Set to `false` to skip lifecycle hooks
    #[serde(default)]
    pub run_hooks: Option<bool>,
}

impl WtmConfig {
    /// Loads settings from a repository with robust error handling.
    ///
    /// # Errors
    ///
    /// Only returns an error if the file exists but cannot be read (e.g.,
    /// permission denied). TOML errors produce a warning and defaults.
    pub fn load_from_repo(repo_path: &Path) -> Result<Self> {
        let config_path = repo_path.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        Ok(Self::parse_or_default(&content))
    }

    /// Parses settings text, warning and falling back to defaults on error
    #[must_use]
    pub fn parse_or_default(content: &str) -> Self {
        if content.trim().is_empty() {
            return Self::default();
        }

        match toml::from_str::<WtmConfig>(content) {
            Ok(config) => config,
            Err(e) => {
                crate::log_warning!("Invalid TOML syntax in {}:", CONFIG_FILE_NAME);
                eprintln!("  {}", e);
                eprintln!("  Using default configuration. Please fix the syntax and try again.");
                Self::default()
            }
        }
    }

    #[must_use]
    pub fn remote(&self) -> &str {
        self.default_remote.as_deref().unwrap_or(DEFAULT_REMOTE)
    }

    #[must_use]
    pub fn hooks_enabled(&self) -> bool {
        self.run_hooks.unwrap_or(true)
    }
}
