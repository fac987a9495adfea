use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::config::WtmConfig;
use crate::git::GitRepo;
use crate::hooks::environment::normalize_path;
use crate::hooks::{HookContext, HookEvent, HookManager};
use crate::storage::WorktreeStorage;
use crate::{log_info, log_warning};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateMode {
    /// Use the branch if it exists, create it otherwise
    Smart,
    /// The branch must not exist yet
    NewBranch,
    /// The branch must already exist
    ExistingBranch,
}

#[derive(Debug, Clone)]
pub struct AddOptions<'a> {
    pub branch: &'a str,
    /// Explicit worktree location; relative paths are taken from the repository root
    pub path: Option<&'a str>,
    /// Starting point for a new branch
    pub base: Option<&'a str>,
    pub mode: CreateMode,
    pub run_hooks: bool,
}

/// Creates a worktree from the current repository's main checkout
///
/// # Errors
/// Returns an error if:
/// - Not inside a git repository, or inside a linked worktree
/// - The target path already exists
/// - The branch does not satisfy the requested `CreateMode`
/// - The `pre_add` hook fails
/// - `git worktree add` fails
pub fn add_worktree(options: &AddOptions<'_>) -> Result<()> {
    let current_dir = std::env::current_dir()?;
    let git_repo = GitRepo::open(&current_dir)?;
    git_repo.ensure_main_checkout()?;

    let repo_path = git_repo.get_repo_path();
    let config = WtmConfig::load_from_repo(&repo_path)?;
    let worktree_path = resolve_worktree_path(&repo_path, &config, options)?;

    if worktree_path.exists() {
        anyhow::bail!("Worktree path already exists: {}", worktree_path.display());
    }

    let branch = options.branch;
    let branch_exists = git_repo.branch_exists(branch)?;
    let create_branch = match options.mode {
        CreateMode::NewBranch if branch_exists => {
            anyhow::bail!("Branch '{}' already exists", branch)
        }
        CreateMode::ExistingBranch if !branch_exists => {
            anyhow::bail!("Branch '{}' does not exist", branch)
        }
        CreateMode::NewBranch => true,
        CreateMode::ExistingBranch => false,
        CreateMode::Smart => !branch_exists,
    };

    if let (Some(base), false) = (options.base, create_branch) {
        log_warning!(
            "Branch '{}' already exists; ignoring --base {}",
            branch,
            base
        );
    }

    let hooks = (options.run_hooks && config.hooks_enabled()).then(|| HookManager::load(&repo_path));
    let context = HookContext::new()
        .with("branch", branch)
        .with("path", worktree_path.as_path());

    if let Some(hooks) = &hooks {
        if !hooks.run(HookEvent::PreAdd, &context) {
            anyhow::bail!("pre_add hook failed; worktree was not created");
        }
    }

    log_info!(
        "Creating worktree for branch '{}' at: {}",
        branch,
        worktree_path.display()
    );
    if create_branch {
        log_info!("Creating new branch: {}", branch);
    }

    // git creates missing parent directories, and none when it fails
    let result = git_repo.add_worktree(branch, &worktree_path, create_branch, options.base);

    if let Some(hooks) = &hooks {
        let mut post_context = context.with("success", result.is_ok());
        if let Err(e) = &result {
            post_context.insert("error", format!("{:#}", e));
        }
        if !hooks.run(HookEvent::PostAdd, &post_context) && result.is_ok() {
            log_warning!(
                "post_add hook failed; the worktree was still created at {}",
                worktree_path.display()
            );
        }
    }

    result.context("Failed to create worktree")?;

    log_info!("✓ Worktree created successfully!");
    log_info!("  Branch: {}", branch);
    log_info!("  Path: {}", worktree_path.display());

    Ok(())
}

fn resolve_worktree_path(
    repo_path: &Path,
    config: &WtmConfig,
    options: &AddOptions<'_>,
) -> Result<PathBuf> {
    if let Some(path) = options.path {
        let path = Path::new(path);
        return Ok(if path.is_absolute() {
            normalize_path(path)
        } else {
            normalize_path(&repo_path.join(path))
        });
    }

    let storage = WorktreeStorage::new(config)?;
    let repo_name = WorktreeStorage::get_repo_name(repo_path)?;
    Ok(storage.get_worktree_path(&repo_name, options.branch))
}
