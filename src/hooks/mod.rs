//! Lifecycle hooks around worktree creation and removal.
//!
//! Hooks are shell commands declared in `.wtm-hooks.yaml` (or
//! `.git/wtm-hooks.yaml`) for four events: `pre_add`, `post_add`,
//! `pre_remove` and `post_remove`. Commands run one at a time, in declared
//! order, with `WORKTREE_*` variables describing the operation.
//!
//! ```yaml
//! hooks:
//!   post_add:
//!     - npm install
//!     - npm run build
//!   pre_remove:
//!     commands: ["./scripts/backup.sh"]
//!     pwd: "$WORKTREE_MANAGER_ROOT"
//!     stop_on_error: false
//! ```

pub mod config;
pub mod environment;
pub mod executor;

use anyhow::Result;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Instant;

use crate::logging;

pub use config::{HookConfig, HookEntry, StructuredHook};
pub use environment::{ContextValue, HookContext, HookEnvironment};

/// The fixed set of lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HookEvent {
    PreAdd,
    PostAdd,
    PreRemove,
    PostRemove,
}

impl HookEvent {
    pub const ALL: [HookEvent; 4] = [
        HookEvent::PreAdd,
        HookEvent::PostAdd,
        HookEvent::PreRemove,
        HookEvent::PostRemove,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            HookEvent::PreAdd => "pre_add",
            HookEvent::PostAdd => "post_add",
            HookEvent::PreRemove => "pre_remove",
            HookEvent::PostRemove => "post_remove",
        }
    }
}

impl fmt::Display for HookEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HookEvent {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        HookEvent::ALL
            .into_iter()
            .find(|event| event.as_str() == s)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Unknown hook event '{}' (expected one of: pre_add, post_add, pre_remove, post_remove)",
                    s
                )
            })
    }
}

/// Loads and runs the hooks of one repository.
pub struct HookManager {
    config: HookConfig,
    environment: HookEnvironment,
    verbose: bool,
}

impl HookManager {
    /// Loads the repository's hook file. Never fails: a missing or broken
    /// file leaves every hook as a no-op.
    #[must_use]
    pub fn load(repo_root: &Path) -> Self {
        Self::new(repo_root, HookConfig::load(repo_root))
    }

    #[must_use]
    pub fn new(repo_root: &Path, config: HookConfig) -> Self {
        Self {
            config,
            environment: HookEnvironment::new(repo_root),
            verbose: logging::is_verbose(),
        }
    }

    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Replaces the captured process environment used for the variable
    /// whitelist and `$NAME` substitution.
    #[must_use]
    pub fn with_process_env(mut self, process_env: HashMap<String, String>) -> Self {
        self.environment =
            HookEnvironment::with_process_env(self.environment.repo_root(), process_env);
        self
    }

    #[must_use]
    pub fn repo_root(&self) -> &Path {
        self.environment.repo_root()
    }

    #[must_use]
    pub fn has_hook(&self, event_name: &str) -> bool {
        event_name
            .parse::<HookEvent>()
            .is_ok_and(|event| self.config.get(event).is_some())
    }

    /// Every configured hook, in lifecycle order
    #[must_use]
    pub fn list_hooks(&self) -> Vec<(HookEvent, &HookEntry)> {
        self.config.iter().collect()
    }

    /// Runs the hook for `event_name`.
    ///
    /// Returns `true` when nothing is configured for the event (including
    /// unknown event names), so callers can invoke hooks unconditionally.
    #[must_use]
    pub fn execute_hook(&self, event_name: &str, context: &HookContext) -> bool {
        match event_name.parse::<HookEvent>() {
            Ok(event) => self.run(event, context),
            Err(_) => true,
        }
    }

    /// Typed form of [`HookManager::execute_hook`]
    #[must_use]
    pub fn run(&self, event: HookEvent, context: &HookContext) -> bool {
        let Some(entry) = self.config.get(event) else {
            return true;
        };

        let started = Instant::now();
        self.trace(|| format!("{}: starting", event));
        self.trace(|| format!("{}: configuration {:?}", event, entry));

        let env = self.environment.build_env_vars(context);
        self.trace(|| {
            let exported: Vec<String> = env
                .iter()
                .filter(|(key, _)| key.starts_with(environment::ENV_PREFIX))
                .map(|(key, value)| format!("{}={}", key, value))
                .collect();
            format!("{}: environment {}", event, exported.join(" "))
        });

        let default_dir = self.environment.default_working_directory(event, context);

        let success = match entry {
            HookEntry::Single(command) => {
                self.run_commands(std::slice::from_ref(command), &default_dir, &env, true)
            }
            HookEntry::Sequence(commands) => self.run_commands(commands, &default_dir, &env, true),
            HookEntry::Structured(hook) => {
                let cwd = hook.pwd.as_deref().map_or(default_dir, |pwd| {
                    self.environment.resolve_working_directory(pwd, context)
                });

                if let Some(commands) = &hook.commands {
                    self.run_commands(commands, &cwd, &env, hook.stop_on_error)
                } else if let Some(command) = &hook.command {
                    self.run_commands(std::slice::from_ref(command), &cwd, &env, true)
                } else {
                    true
                }
            }
        };

        self.trace(|| {
            format!(
                "{}: {} in {:.2?}",
                event,
                if success { "succeeded" } else { "failed" },
                started.elapsed()
            )
        });

        success
    }

    /// Runs commands one after another.
    ///
    /// With `stop_on_error` the first failure ends the run with `false`.
    /// Without it every command runs and the result is `true`.
    fn run_commands(
        &self,
        commands: &[String],
        cwd: &Path,
        env: &BTreeMap<String, String>,
        stop_on_error: bool,
    ) -> bool {
        self.trace(|| format!("working directory {}", cwd.display()));

        for command in commands {
            if !executor::execute_command(command, cwd, env, self.verbose) && stop_on_error {
                self.trace(|| "stopping after failed command".to_string());
                return false;
            }
        }

        true
    }

    fn trace(&self, message: impl FnOnce() -> String) {
        if self.verbose {
            logging::debug_line(&format!("[hooks] {}", message()));
        }
    }
}
