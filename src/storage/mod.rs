use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::config::WtmConfig;

/// Environment variable that overrides where new worktrees are placed
pub const STORAGE_ROOT_ENV: &str = "WTM_STORAGE_ROOT";

/// Decides where new worktrees live: `<root>/<repo-name>/<sanitized-branch>`.
pub struct WorktreeStorage {
    root_dir: PathBuf,
}

impl WorktreeStorage {
    /// Creates a WorktreeStorage rooted at the configured location
    ///
    /// Precedence: `WTM_STORAGE_ROOT`, then `worktrees-dir` from the settings
    /// file, then `~/.worktrees`.
    ///
    /// # Errors
    /// Returns an error if:
    /// - Failed to determine home directory
    /// - Failed to create storage directory
    pub fn new(config: &WtmConfig) -> Result<Self> {
        let root_dir = if let Ok(custom_root) = std::env::var(STORAGE_ROOT_ENV) {
            PathBuf::from(custom_root)
        } else if let Some(dir) = &config.worktrees_dir {
            expand_home(dir)?
        } else {
            dirs::home_dir()
                .context("Failed to get user home directory")?
                .join(".worktrees")
        };

        std::fs::create_dir_all(&root_dir).with_context(|| {
            format!(
                "Failed to create worktrees directory: {}",
                root_dir.display()
            )
        })?;

        Ok(Self { root_dir })
    }

    /// Extracts repository name from a path
    ///
    /// # Errors
    /// Returns an error if the path doesn't have a valid file name
    pub fn get_repo_name(repo_path: &Path) -> Result<String> {
        if let Some(name) = repo_path.file_name() {
            Ok(name.to_string_lossy().to_string())
        } else {
            anyhow::bail!("Could not determine repository name from path")
        }
    }

    #[must_use]
    pub fn sanitize_branch_name(branch_name: &str) -> String {
        branch_name.replace(['/', '\\', ':', '*', '?', '"', '<', '>', '|'], "-")
    }

    #[must_use]
    pub fn get_worktree_path(&self, repo_name: &str, branch_name: &str) -> PathBuf {
        let safe_branch_name = Self::sanitize_branch_name(branch_name);
        self.root_dir.join(repo_name).join(safe_branch_name)
    }

    /// Gets the root storage directory
    #[must_use]
    pub fn get_root_dir(&self) -> &Path {
        &self.root_dir
    }
}

/// Expands a leading `~` to the user's home directory
fn expand_home(path: &str) -> Result<PathBuf> {
    if path == "~" {
        return dirs::home_dir().context("Failed to get user home directory");
    }
    if let Some(rest) = path.strip_prefix("~/") {
        let home = dirs::home_dir().context("Failed to get user home directory")?;
        return Ok(home.join(rest));
    }
    Ok(PathBuf::from(path))
}
