use anyhow::{Context, Result};

use crate::config::WtmConfig;
use crate::git::GitRepo;
use crate::log_info;

use super::{find_worktree, worktree_containing};

/// Hard-resets a worktree to its branch on the remote
///
/// Without a target the worktree containing the current directory is used.
///
/// # Errors
/// Returns an error if:
/// - The target cannot be resolved
/// - The worktree has no branch checked out
/// - `git fetch` or `git reset` fails
pub fn reset_worktree(target: Option<&str>, remote: Option<&str>) -> Result<()> {
    let current_dir = std::env::current_dir()?;
    let git_repo = GitRepo::open(&current_dir)?;
    let records = git_repo.list_worktrees();

    let record = match target {
        Some(target) => find_worktree(&records, target)?,
        None => worktree_containing(&records, &current_dir).ok_or_else(|| {
            anyhow::anyhow!(
                "Current directory is not inside a worktree: {}",
                current_dir.display()
            )
        })?,
    };

    let Some(branch) = record.branch.as_deref() else {
        anyhow::bail!(
            "Cannot reset {}: no branch is checked out",
            record.path.display()
        );
    };

    let config = WtmConfig::load_from_repo(&git_repo.main_worktree_path())?;
    let remote = remote.unwrap_or_else(|| config.remote());
    let upstream = format!("{}/{}", remote, branch);

    log_info!("Fetching {} from {}...", branch, remote);
    git_repo
        .fetch(&record.path, remote, branch)
        .with_context(|| format!("Failed to fetch {}", upstream))?;

    log_info!("Resetting {} to {}", record.path.display(), upstream);
    git_repo
        .reset_hard(&record.path, &upstream)
        .with_context(|| format!("Failed to reset to {}", upstream))?;

    log_info!("✓ Worktree reset to {}", upstream);

    Ok(())
}
