//! Git access.
//!
//! Repository discovery and branch lookups go through git2. Everything that
//! changes worktrees or talks to a remote is delegated to the `git` binary so
//! that users get exactly the behavior (hooks, config, credential helpers) of
//! their own git installation.

pub mod porcelain;

use anyhow::{Context, Result};
use git2::{BranchType, Repository};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Command;

pub use porcelain::{WorktreeRecord, parse_worktree_list};

pub struct GitRepo {
    repo: Repository,
}

impl GitRepo {
    /// Opens the git repository containing the specified path
    ///
    /// # Errors
    /// Returns an error if:
    /// - The path is not inside a git repository
    /// - Failed to access the repository
    pub fn open(path: &Path) -> Result<Self> {
        let repo = Repository::discover(path).context("Failed to find git repository")?;
        Ok(Self { repo })
    }

    /// Root of the checkout that was discovered (may be a linked worktree)
    #[must_use]
    pub fn get_repo_path(&self) -> PathBuf {
        // git2 reports directories with a trailing separator
        self.repo
            .workdir()
            .unwrap_or_else(|| self.repo.path())
            .components()
            .collect()
    }

    /// True when the discovered checkout is a linked worktree
    #[must_use]
    pub fn is_linked_worktree(&self) -> bool {
        self.repo.is_worktree()
    }

    /// Root of the main checkout, even when opened from a linked worktree
    #[must_use]
    pub fn main_worktree_path(&self) -> PathBuf {
        if !self.repo.is_worktree() {
            return self.get_repo_path();
        }

        // commondir is the main checkout's .git directory
        let common_dir = self.repo.commondir();
        let common_dir: PathBuf = common_dir.components().collect();
        if self.repo.is_bare() {
            return common_dir;
        }
        common_dir
            .parent()
            .map_or_else(|| common_dir.clone(), Path::to_path_buf)
    }

    /// Fails unless the repository was opened from its main checkout
    ///
    /// # Errors
    /// Returns an error when the current checkout is a linked worktree
    pub fn ensure_main_checkout(&self) -> Result<()> {
        if self.is_linked_worktree() {
            anyhow::bail!(
                "This command must be run from the main checkout, not a linked worktree.\n\
                Main checkout: {}",
                self.main_worktree_path().display()
            );
        }
        Ok(())
    }

    /// Checks if a branch exists in the repository
    ///
    /// # Errors
    /// Returns an error if git operations fail
    pub fn branch_exists(&self, branch_name: &str) -> Result<bool> {
        match self.repo.find_branch(branch_name, BranchType::Local) {
            Ok(_) => Ok(true),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn run_git<I, S>(&self, dir: &Path, args: I, action: &str) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let output = Command::new("git")
            .args(args)
            .current_dir(dir)
            .output()
            .with_context(|| format!("Failed to execute git {} command", action))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("Git {} failed: {}", action, stderr.trim());
        }

        String::from_utf8(output.stdout)
            .with_context(|| format!("Failed to parse git {} output", action))
    }

    /// Raw output of `git worktree list --porcelain`
    ///
    /// # Errors
    /// Returns an error if git cannot be run or exits non-zero
    pub fn worktree_list_porcelain(&self) -> Result<String> {
        self.run_git(
            &self.main_worktree_path(),
            ["worktree", "list", "--porcelain"],
            "worktree list",
        )
    }

    /// All worktrees of the repository, main checkout first.
    ///
    /// A listing failure yields an empty list rather than an error.
    #[must_use]
    pub fn list_worktrees(&self) -> Vec<WorktreeRecord> {
        match self.worktree_list_porcelain() {
            Ok(output) => parse_worktree_list(&output),
            Err(e) => {
                crate::log_debug!("Treating worktree listing as empty: {}", e);
                Vec::new()
            }
        }
    }

    /// Creates a linked worktree at `worktree_path`
    ///
    /// With `create_branch` the branch is created from `base` (or HEAD).
    ///
    /// # Errors
    /// Returns an error if `git worktree add` fails
    pub fn add_worktree(
        &self,
        branch_name: &str,
        worktree_path: &Path,
        create_branch: bool,
        base: Option<&str>,
    ) -> Result<()> {
        let mut args: Vec<&OsStr> = vec![OsStr::new("worktree"), OsStr::new("add")];
        if create_branch {
            args.extend([OsStr::new("-b"), OsStr::new(branch_name)]);
            args.push(worktree_path.as_os_str());
            if let Some(base) = base {
                args.push(OsStr::new(base));
            }
        } else {
            args.push(worktree_path.as_os_str());
            args.push(OsStr::new(branch_name));
        }

        self.run_git(&self.get_repo_path(), args, "worktree add")?;
        Ok(())
    }

    /// Removes a linked worktree and its directory
    ///
    /// # Errors
    /// Returns an error if `git worktree remove` fails (e.g. uncommitted
    /// changes without `force`)
    pub fn remove_worktree(&self, worktree_path: &Path, force: bool) -> Result<()> {
        let mut args: Vec<&OsStr> = vec![OsStr::new("worktree"), OsStr::new("remove")];
        if force {
            args.push(OsStr::new("--force"));
        }
        args.push(worktree_path.as_os_str());

        self.run_git(&self.get_repo_path(), args, "worktree remove")?;
        Ok(())
    }

    /// Deletes a local branch (`-d`, or `-D` when forced)
    ///
    /// # Errors
    /// Returns an error if the branch is missing or not fully merged
    pub fn delete_branch(&self, branch_name: &str, force: bool) -> Result<()> {
        let flag = if force { "-D" } else { "-d" };
        self.run_git(
            &self.get_repo_path(),
            ["branch", flag, branch_name],
            "branch delete",
        )?;
        Ok(())
    }

    /// Fetches `branch` from `remote` inside the given worktree
    ///
    /// # Errors
    /// Returns an error if the fetch fails
    pub fn fetch(&self, worktree_path: &Path, remote: &str, branch: &str) -> Result<()> {
        self.run_git(worktree_path, ["fetch", remote, branch], "fetch")?;
        Ok(())
    }

    /// Hard-resets the given worktree to `target`
    ///
    /// # Errors
    /// Returns an error if the reset fails
    pub fn reset_hard(&self, worktree_path: &Path, target: &str) -> Result<()> {
        self.run_git(worktree_path, ["reset", "--hard", target], "reset")?;
        Ok(())
    }
}
