use anyhow::Result;

use crate::config::WtmConfig;
use crate::git::{GitRepo, WorktreeRecord};
use crate::hooks::{HookContext, HookEvent, HookManager};
use crate::selection::{RealSelectionProvider, SelectionProvider, select_worktree};
use crate::{log_info, log_warning};

use super::find_worktree;

#[derive(Debug, Clone, Default)]
pub struct RemoveOptions<'a> {
    pub target: Option<&'a str>,
    /// Passed through to `git worktree remove` and `git branch -D`
    pub force: bool,
    pub keep_branch: bool,
    pub interactive: bool,
    pub run_hooks: bool,
    pub list_completions: bool,
}

/// Removes a linked worktree and, unless kept, its branch
///
/// # Errors
/// Returns an error if:
/// - Not run from the main checkout
/// - The target doesn't match a linked worktree
/// - Interactive selection fails
/// - The `pre_remove` hook fails
/// - `git worktree remove` fails
pub fn remove_worktree(options: &RemoveOptions<'_>) -> Result<()> {
    remove_worktree_with_provider(options, &RealSelectionProvider)
}

/// Removes a worktree with a custom selection provider (for testing)
///
/// # Errors
/// Same as [`remove_worktree`]
pub fn remove_worktree_with_provider(
    options: &RemoveOptions<'_>,
    provider: &dyn SelectionProvider,
) -> Result<()> {
    let current_dir = std::env::current_dir()?;
    let git_repo = GitRepo::open(&current_dir)?;
    let records = git_repo.list_worktrees();
    let linked: Vec<WorktreeRecord> = records.iter().skip(1).cloned().collect();

    if options.list_completions {
        for record in &linked {
            if let Some(branch) = &record.branch {
                println!("{}", branch);
            }
        }
        return Ok(());
    }

    git_repo.ensure_main_checkout()?;

    let record = match options.target {
        Some(target) if !options.interactive => find_worktree(&records, target)?.clone(),
        _ => select_worktree("Select worktree to remove:", &linked, provider)?,
    };

    if records.first().is_some_and(|main| main.path == record.path) {
        anyhow::bail!(
            "Cannot remove the main checkout: {}",
            record.path.display()
        );
    }

    let repo_path = git_repo.get_repo_path();
    let config = WtmConfig::load_from_repo(&repo_path)?;
    let hooks = (options.run_hooks && config.hooks_enabled()).then(|| HookManager::load(&repo_path));

    let context = HookContext::new()
        .with("branch", record.branch.as_deref().unwrap_or_default())
        .with("path", record.path.as_path())
        .with("force", options.force);

    if let Some(hooks) = &hooks {
        if !hooks.run(HookEvent::PreRemove, &context) {
            anyhow::bail!("pre_remove hook failed; worktree was not removed");
        }
    }

    log_info!("Removing worktree: {}", record.path.display());
    log_info!("Branch: {}", record.display_name());

    let result = git_repo.remove_worktree(&record.path, options.force);

    if result.is_ok() && !options.keep_branch {
        if let Some(branch) = &record.branch {
            log_info!("Deleting branch: {}", branch);
            match git_repo.delete_branch(branch, options.force) {
                Ok(()) => log_info!("✓ Branch deleted successfully"),
                Err(e) => log_warning!("Failed to delete branch: {}", e),
            }
        }
    }

    if let Some(hooks) = &hooks {
        let mut post_context = context.with("success", result.is_ok());
        if let Err(e) = &result {
            post_context.insert("error", format!("{:#}", e));
        }
        if !hooks.run(HookEvent::PostRemove, &post_context) {
            log_warning!("post_remove hook failed");
        }
    }

    result?;

    log_info!("✓ Worktree removed successfully!");

    Ok(())
}
