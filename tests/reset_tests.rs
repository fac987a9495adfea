//! Integration tests for the reset command
//!
//! Each test clones the repository into a local bare remote so fetches
//! never leave the temp dir.

use anyhow::Result;
use assert_fs::prelude::*;
use predicates::prelude::*;

use test_support::CliTestEnvironment;

/// Publishes the repository to a bare `origin` next to it
fn with_remote(env: &CliTestEnvironment, name: &str) -> Result<()> {
    let remote = env.sibling(&format!("{}.git", name));
    let remote_path = remote.path().display().to_string();
    env.git(&["clone", "--bare", ".", &remote_path])?;
    env.git(&["remote", "add", name, &remote_path])?;
    env.git(&["fetch", name])?;
    Ok(())
}

/// Local commits in the current worktree are discarded
#[test]
fn test_reset_current_worktree() -> Result<()> {
    let env = CliTestEnvironment::new()?;
    with_remote(&env, "origin")?;
    let published = env.git(&["rev-parse", "HEAD"])?;

    env.commit_file(env.repo_dir.path(), "local.txt", "local only")?;

    env.run_command(&["reset"])?
        .assert()
        .success()
        .stdout(predicate::str::contains("origin/main"));

    assert_eq!(env.git(&["rev-parse", "HEAD"])?, published);
    env.repo_dir
        .child("local.txt")
        .assert(predicate::path::missing());
    Ok(())
}

/// A named worktree is reset without leaving the main checkout
#[test]
fn test_reset_named_worktree() -> Result<()> {
    let env = CliTestEnvironment::new()?;
    let worktree = env.add_worktree("topic")?;
    with_remote(&env, "origin")?;
    let published = env.git_in(worktree.path(), &["rev-parse", "HEAD"])?;

    env.commit_file(worktree.path(), "scratch.txt", "scratch")?;

    env.run_command(&["reset", "topic"])?.assert().success();

    assert_eq!(env.git_in(worktree.path(), &["rev-parse", "HEAD"])?, published);
    Ok(())
}

/// `default-remote` from `.wtm.toml` replaces `origin`
#[test]
fn test_reset_uses_default_remote_setting() -> Result<()> {
    let env = CliTestEnvironment::new()?;
    with_remote(&env, "upstream")?;
    test_support::write_settings_file(&env.repo_dir, "default-remote = \"upstream\"\n")?;

    env.run_command(&["reset"])?
        .assert()
        .success()
        .stdout(predicate::str::contains("upstream/main"));
    Ok(())
}

#[test]
fn test_reset_unknown_remote_fails() -> Result<()> {
    let env = CliTestEnvironment::new()?;

    env.run_command(&["reset", "--remote", "missing-remote"])?
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to fetch missing-remote/main"));
    Ok(())
}

#[test]
fn test_reset_detached_worktree_fails() -> Result<()> {
    let env = CliTestEnvironment::new()?;
    let detached = env.sibling("detached-wt");
    env.git(&[
        "worktree",
        "add",
        "--detach",
        &detached.path().display().to_string(),
    ])?;

    env.run_command_in(detached.path(), &["reset"])?
        .assert()
        .failure()
        .stderr(predicate::str::contains("no branch is checked out"));
    Ok(())
}
