//! Runs a single hook command through the platform shell.

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::Path;
use std::process::{Command, Output, Stdio};
use std::time::Instant;

use crate::logging;

fn shell_command(command: &str) -> Command {
    if cfg!(windows) {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", command]);
        cmd
    } else {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", command]);
        cmd
    }
}

/// Forwards captured output once the command has finished.
fn forward_output(output: &Output) {
    let mut stdout = io::stdout().lock();
    let _ = stdout.write_all(&output.stdout);
    let _ = stdout.flush();

    let mut stderr = io::stderr().lock();
    let _ = stderr.write_all(&output.stderr);
    let _ = stderr.flush();
}

/// Runs `command` in `cwd` with `env` layered over the inherited environment.
///
/// Blocks until the command exits. Returns `true` on exit code zero; a
/// non-zero exit or a failure to start the shell is reported on stderr and
/// returns `false`.
#[must_use]
pub fn execute_command(
    command: &str,
    cwd: &Path,
    env: &BTreeMap<String, String>,
    verbose: bool,
) -> bool {
    if verbose {
        logging::debug_line(&format!("[hooks] $ {}", command));
    }

    let started = Instant::now();
    let result = shell_command(command)
        .current_dir(cwd)
        .envs(env)
        .stdin(Stdio::inherit())
        .output();

    let output = match result {
        Ok(output) => output,
        Err(e) => {
            eprintln!("Hook command failed: {} ({})", command, e);
            return false;
        }
    };

    forward_output(&output);

    let exit_code = output
        .status
        .code()
        .map_or_else(|| "signal".to_string(), |code| code.to_string());

    if verbose {
        logging::debug_line(&format!(
            "[hooks] exit code {} after {:.2?}",
            exit_code,
            started.elapsed()
        ));
    }

    if output.status.success() {
        true
    } else {
        eprintln!("Hook command failed (exit code {}): {}", exit_code, command);
        false
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_success_and_failure() {
        let dir = tempfile::tempdir().unwrap();
        let env = BTreeMap::new();

        assert!(execute_command("true", dir.path(), &env, false));
        assert!(!execute_command("exit 3", dir.path(), &env, false));
    }

    #[test]
    fn test_runs_in_directory_with_env() {
        let dir = tempfile::tempdir().unwrap();
        let env = BTreeMap::from([("WORKTREE_BRANCH".to_string(), "topic".to_string())]);

        assert!(execute_command(
            "printf '%s' \"$WORKTREE_BRANCH\" > out.txt",
            dir.path(),
            &env,
            false
        ));
        let written = std::fs::read_to_string(dir.path().join("out.txt")).unwrap();
        assert_eq!(written, "topic");
    }

    #[test]
    fn test_missing_directory_is_a_failure() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        assert!(!execute_command("true", &missing, &BTreeMap::new(), false));
    }
}
