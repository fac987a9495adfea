//! Command implementations, one module per subcommand.

pub mod add;
pub mod hooks;
pub mod init;
pub mod jump;
pub mod list;
pub mod remove;
pub mod reset;

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::git::WorktreeRecord;

/// Target aliases for the main checkout
pub const MAIN_ALIASES: [&str; 2] = ["@", "@main"];

fn canonical(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// Resolves a user-supplied target to one worktree.
///
/// Tried in order: `@`/`@main` for the main checkout, exact branch name, worktree
/// path, then a unique partial branch match.
///
/// # Errors
/// Returns an error when nothing matches or the partial match is ambiguous
pub fn find_worktree<'a>(records: &'a [WorktreeRecord], target: &str) -> Result<&'a WorktreeRecord> {
    if MAIN_ALIASES.contains(&target) {
        return records
            .first()
            .ok_or_else(|| anyhow::anyhow!("No worktrees found"));
    }

    if let Some(record) = records
        .iter()
        .find(|record| record.branch.as_deref() == Some(target))
    {
        return Ok(record);
    }

    let target_path = canonical(Path::new(target));
    if let Some(record) = records
        .iter()
        .find(|record| canonical(&record.path) == target_path)
    {
        return Ok(record);
    }

    let matches: Vec<_> = records
        .iter()
        .filter(|record| {
            record
                .branch
                .as_deref()
                .is_some_and(|branch| branch.contains(target))
        })
        .collect();

    match matches.as_slice() {
        [] => anyhow::bail!("No worktree found matching '{}'", target),
        [record] => Ok(*record),
        _ => {
            // Multiple matches - show them and ask user to be more specific
            eprintln!(
                "Multiple worktrees match '{}'. Please be more specific:",
                target
            );
            for record in &matches {
                eprintln!("  {} ({})", record.display_name(), record.path.display());
            }
            anyhow::bail!("Ambiguous worktree name")
        }
    }
}

/// The worktree whose directory contains `dir` (deepest match wins)
#[must_use]
pub fn worktree_containing<'a>(records: &'a [WorktreeRecord], dir: &Path) -> Option<&'a WorktreeRecord> {
    let dir = canonical(dir);
    records
        .iter()
        .filter(|record| dir.starts_with(canonical(&record.path)))
        .max_by_key(|record| record.path.components().count())
}
