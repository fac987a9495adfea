use anyhow::Result;
use assert_fs::fixture::ChildPath;
use assert_fs::prelude::*;

/// Writes `.wtm-hooks.yaml` into the repository root
///
/// # Errors
/// Returns an error if the file cannot be written
pub fn write_hook_file(repo_dir: &ChildPath, yaml: &str) -> Result<()> {
    repo_dir.child(".wtm-hooks.yaml").write_str(yaml)?;
    Ok(())
}

/// Writes `.wtm.toml` into the repository root
///
/// # Errors
/// Returns an error if the file cannot be written
pub fn write_settings_file(repo_dir: &ChildPath, toml: &str) -> Result<()> {
    repo_dir.child(".wtm.toml").write_str(toml)?;
    Ok(())
}
