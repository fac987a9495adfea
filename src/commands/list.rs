use anyhow::Result;

use crate::git::{GitRepo, WorktreeRecord};
use crate::storage::WorktreeStorage;

pub fn list_worktrees(porcelain: bool) -> Result<()> {
    let current_dir = std::env::current_dir()?;
    let git_repo = GitRepo::open(&current_dir)?;
    let records = git_repo.list_worktrees();

    if porcelain {
        for record in &records {
            println!("{}", porcelain_line(record));
        }
        return Ok(());
    }

    let repo_name = WorktreeStorage::get_repo_name(&git_repo.main_worktree_path())?;
    println!("Worktrees for repository: {}", repo_name);
    println!("{}", "=".repeat(40));

    if records.is_empty() {
        println!("No worktrees found for this repository.");
        return Ok(());
    }

    for (index, record) in records.iter().enumerate() {
        println!("{}", display_line(record, index == 0));
    }

    Ok(())
}

fn display_line(record: &WorktreeRecord, is_first: bool) -> String {
    let marker = if is_first { "*" } else { " " };
    format!(
        "{} {:<30} {:<7} {}",
        marker,
        record.display_name(),
        record.short_head(),
        record.path.display()
    )
}

/// `path<TAB>branch<TAB>head`, with an empty branch field when detached
fn porcelain_line(record: &WorktreeRecord) -> String {
    format!(
        "{}\t{}\t{}",
        record.path.display(),
        record.branch.as_deref().unwrap_or_default(),
        record.head
    )
}
