#![allow(clippy::unwrap_used)] // Tests use unwrap for simplicity

use anyhow::{Context, Result};
use assert_fs::TempDir;
use assert_fs::prelude::*;

use std::path::Path;
use std::process::Command;

/// A real git repository plus an isolated worktree storage root
pub struct CliTestEnvironment {
    pub repo_dir: assert_fs::fixture::ChildPath,
    pub storage_dir: assert_fs::fixture::ChildPath,
    temp_dir: TempDir,
}

impl CliTestEnvironment {
    /// Creates a new test environment with a real git repository and storage directory
    ///
    /// The repository has one commit on `main`.
    ///
    /// # Errors
    /// Returns an error if:
    /// - Failed to create temporary directory
    /// - Failed to initialize git repository
    /// - Failed to configure git settings
    /// - Failed to create initial commit
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new().context("Failed to create temporary directory")?;
        let repo_dir = temp_dir.child("test_repo");
        let storage_dir = temp_dir.child("worktrees");

        repo_dir.create_dir_all()?;
        storage_dir.create_dir_all()?;

        run_git(repo_dir.path(), &["init"])?;
        run_git(repo_dir.path(), &["config", "user.name", "Test User"])?;
        run_git(repo_dir.path(), &["config", "user.email", "test@example.com"])?;

        repo_dir.child("README.md").write_str("# Test Repo")?;
        run_git(repo_dir.path(), &["add", "."])?;
        run_git(repo_dir.path(), &["commit", "-m", "Initial commit"])?;

        // Some git versions default to 'master'
        run_git(repo_dir.path(), &["branch", "-M", "main"])?;

        Ok(Self {
            repo_dir,
            storage_dir,
            temp_dir,
        })
    }

    /// A path next to the repository, inside the same temp dir
    pub fn sibling(&self, name: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(name)
    }

    /// Runs git in the repository and returns its trimmed stdout
    ///
    /// # Errors
    /// Returns an error if git exits non-zero
    pub fn git(&self, args: &[&str]) -> Result<String> {
        run_git(self.repo_dir.path(), args)
    }

    /// Runs git in `dir` and returns its trimmed stdout
    ///
    /// # Errors
    /// Returns an error if git exits non-zero
    pub fn git_in(&self, dir: &Path, args: &[&str]) -> Result<String> {
        run_git(dir, args)
    }

    /// Commits a file with the given content in `dir`
    ///
    /// # Errors
    /// Returns an error if writing or committing fails
    pub fn commit_file(&self, dir: &Path, name: &str, content: &str) -> Result<()> {
        std::fs::write(dir.join(name), content)?;
        run_git(dir, &["add", name])?;
        run_git(dir, &["commit", "-m", &format!("Add {}", name)])?;
        Ok(())
    }

    /// Execute a non-interactive CLI command from the repository root
    ///
    /// # Errors
    /// Returns an error if the command setup fails
    pub fn run_command(&self, args: &[&str]) -> Result<assert_cmd::Command> {
        self.run_command_in(self.repo_dir.path(), args)
    }

    /// Execute a non-interactive CLI command from `dir`
    ///
    /// # Errors
    /// Returns an error if the command setup fails
    pub fn run_command_in(&self, dir: &Path, args: &[&str]) -> Result<assert_cmd::Command> {
        let mut cmd =
            assert_cmd::Command::cargo_bin("wtm-bin").context("Failed to find wtm-bin binary")?;

        cmd.current_dir(dir)
            .env("WTM_STORAGE_ROOT", self.storage_dir.path())
            .env_remove("WTM_VERBOSE");

        cmd.args(args);
        Ok(cmd)
    }

    /// Get the path to a worktree within the storage directory
    pub fn worktree_path(&self, branch_name: &str) -> assert_fs::fixture::ChildPath {
        // Use the same sanitization logic as the main application
        let sanitized = branch_name.replace('/', "-");
        self.storage_dir.child("test_repo").child(&sanitized)
    }

    /// Creates a worktree through the CLI and asserts success
    ///
    /// # Errors
    /// Returns an error if the command setup fails
    pub fn add_worktree(&self, branch_name: &str) -> Result<assert_fs::fixture::ChildPath> {
        self.run_command(&["add", branch_name, "--no-hooks"])?
            .assert()
            .success();
        Ok(self.worktree_path(branch_name))
    }
}

fn run_git(dir: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .context("Failed to execute git command")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("Git command failed: {}", stderr);
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use predicates::prelude::*;

    #[test]
    fn test_cli_test_environment_creation() -> Result<()> {
        let env = CliTestEnvironment::new()?;

        env.repo_dir.assert(predicate::path::is_dir());
        env.repo_dir.child(".git").assert(predicate::path::exists());
        env.repo_dir
            .child("README.md")
            .assert(predicate::str::contains("# Test Repo"));
        env.storage_dir.assert(predicate::path::is_dir());

        assert_eq!(env.git(&["rev-parse", "--abbrev-ref", "HEAD"])?, "main");

        Ok(())
    }

    #[test]
    fn test_worktree_path_sanitization() -> Result<()> {
        let env = CliTestEnvironment::new()?;

        let path = env.worktree_path("feature/test-branch");
        assert!(
            path.path()
                .to_string_lossy()
                .contains("feature-test-branch")
        );

        Ok(())
    }
}
