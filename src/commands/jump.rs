use anyhow::Result;
use std::path::PathBuf;

use crate::git::{GitRepo, WorktreeRecord};
use crate::selection::{RealSelectionProvider, SelectionProvider, select_worktree};

use super::find_worktree;

/// Prints the path of a worktree for the shell wrapper to `cd` into
///
/// # Errors
/// Returns an error if:
/// - Not inside a git repository
/// - The target matches no worktree, or several
/// - Interactive selection fails
pub fn jump_worktree(target: Option<&str>, interactive: bool, list_completions: bool) -> Result<()> {
    jump_worktree_with_provider(target, interactive, list_completions, &RealSelectionProvider)
}

/// Jump with a custom selection provider (for testing)
///
/// # Errors
/// Same as [`jump_worktree`]
pub fn jump_worktree_with_provider(
    target: Option<&str>,
    interactive: bool,
    list_completions: bool,
    provider: &dyn SelectionProvider,
) -> Result<()> {
    let current_dir = std::env::current_dir()?;
    let git_repo = GitRepo::open(&current_dir)?;
    let records = git_repo.list_worktrees();

    if list_completions {
        for name in completion_names(&records) {
            println!("{}", name);
        }
        return Ok(());
    }

    let target_path = resolve_jump_target(&records, target, interactive, provider)?;

    // Output just the path (shell function will handle cd)
    println!("{}", target_path.display());
    Ok(())
}

fn resolve_jump_target(
    records: &[WorktreeRecord],
    target: Option<&str>,
    interactive: bool,
    provider: &dyn SelectionProvider,
) -> Result<PathBuf> {
    match target {
        Some(target) if !interactive => Ok(find_worktree(records, target)?.path.clone()),
        _ => Ok(select_worktree("Jump to worktree:", records, provider)?.path),
    }
}

fn completion_names(records: &[WorktreeRecord]) -> Vec<&str> {
    records
        .iter()
        .filter_map(|record| record.branch.as_deref())
        .collect()
}
