use anyhow::Result;

use crate::git::GitRepo;
use crate::hooks::{HookConfig, HookEntry, HookManager};

/// Prints the configured lifecycle hooks
///
/// With `event`, prints only that hook and fails when it is not configured.
///
/// # Errors
/// Returns an error if not inside a git repository, or if `event` has no hook
pub fn show_hooks(event: Option<&str>) -> Result<()> {
    let current_dir = std::env::current_dir()?;
    let git_repo = GitRepo::open(&current_dir)?;
    let repo_root = git_repo.main_worktree_path();
    let manager = HookManager::load(&repo_root);

    if let Some(event) = event {
        if !manager.has_hook(event) {
            anyhow::bail!("No hook configured for '{}'", event);
        }
        for (configured, entry) in manager.list_hooks() {
            if configured.as_str() == event {
                print_entry(configured.as_str(), entry);
            }
        }
        return Ok(());
    }

    let hooks = manager.list_hooks();
    if hooks.is_empty() {
        match HookConfig::find_hook_file(&repo_root) {
            Some(path) => println!("No hooks configured in {}", path.display()),
            None => println!("No hook file found in {}", repo_root.display()),
        }
        return Ok(());
    }

    for (event, entry) in hooks {
        print_entry(event.as_str(), entry);
    }

    Ok(())
}

fn print_entry(event: &str, entry: &HookEntry) {
    println!("{}:", event);
    if let Some(pwd) = entry.pwd() {
        println!("  pwd: {}", pwd);
    }
    if !entry.stop_on_error() {
        println!("  stop_on_error: false");
    }
    for command in entry.commands() {
        println!("  - {}", command);
    }
}
