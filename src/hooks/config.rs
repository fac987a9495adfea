//! Hook configuration loading.
//!
//! Two document layouts are accepted:
//!
//! ```yaml
//! hooks:
//!   post_add: npm install
//! ```
//!
//! and the legacy form with event keys at the top level:
//!
//! ```yaml
//! post_add: npm install
//! ```
//!
//! When a `hooks` mapping is present it wins and top-level event keys are
//! ignored.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::HookEvent;

/// Hook files in priority order, relative to the repository root.
pub const HOOK_FILE_CANDIDATES: [&str; 2] = [".wtm-hooks.yaml", ".git/wtm-hooks.yaml"];

/// The command(s) configured for one lifecycle event.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum HookEntry {
    /// `post_add: npm install`
    Single(String),
    /// `post_add: [npm install, npm run build]`, always stops at the first failure
    Sequence(Vec<String>),
    /// Mapping form with optional working directory and error policy
    Structured(StructuredHook),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StructuredHook {
    #[serde(default)]
    pub command: Option<String>,
    /// Takes precedence over `command` when both are given
    #[serde(default)]
    pub commands: Option<Vec<String>>,
    /// Working directory override; `$VARIABLES` are substituted
    #[serde(default)]
    pub pwd: Option<String>,
    #[serde(default = "default_stop_on_error")]
    pub stop_on_error: bool,
}

fn default_stop_on_error() -> bool {
    true
}

impl HookEntry {
    /// Commands that will run for this entry, in order
    #[must_use]
    pub fn commands(&self) -> Vec<&str> {
        match self {
            HookEntry::Single(command) => vec![command.as_str()],
            HookEntry::Sequence(commands) => commands.iter().map(String::as_str).collect(),
            HookEntry::Structured(hook) => match (&hook.commands, &hook.command) {
                (Some(commands), _) => commands.iter().map(String::as_str).collect(),
                (None, Some(command)) => vec![command.as_str()],
                (None, None) => Vec::new(),
            },
        }
    }

    #[must_use]
    pub fn stop_on_error(&self) -> bool {
        match self {
            HookEntry::Single(_) | HookEntry::Sequence(_) => true,
            HookEntry::Structured(hook) => hook.stop_on_error,
        }
    }

    #[must_use]
    pub fn pwd(&self) -> Option<&str> {
        match self {
            HookEntry::Structured(hook) => hook.pwd.as_deref(),
            _ => None,
        }
    }
}

/// Normalized hooks for one repository. Only recognized, non-null events
/// are stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HookConfig {
    entries: BTreeMap<HookEvent, HookEntry>,
}

impl HookConfig {
    /// First existing hook file under `repo_root`
    #[must_use]
    pub fn find_hook_file(repo_root: &Path) -> Option<PathBuf> {
        HOOK_FILE_CANDIDATES
            .iter()
            .map(|candidate| repo_root.join(candidate))
            .find(|path| path.is_file())
    }

    /// Loads the hook configuration for a repository.
    ///
    /// A missing file yields an empty configuration. An unreadable or
    /// malformed file is reported as a warning and also yields an empty
    /// configuration, so every hook becomes a no-op.
    #[must_use]
    pub fn load(repo_root: &Path) -> Self {
        let Some(path) = Self::find_hook_file(repo_root) else {
            return Self::default();
        };

        let parsed = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read hook file: {}", path.display()))
            .and_then(|content| Self::from_yaml_str(&content));

        match parsed {
            Ok(config) => {
                crate::log_debug!("Loaded hooks from {}", path.display());
                config
            }
            Err(e) => {
                crate::log_warning!("Invalid hook configuration in {}:", path.display());
                eprintln!("  {:#}", e);
                eprintln!("  Hooks are disabled. Please fix the file and try again.");
                Self::default()
            }
        }
    }

    /// Parses a hook document.
    ///
    /// # Errors
    /// Returns an error if the text is not valid YAML or the document is not
    /// a mapping. Individual events with an unsupported value are skipped
    /// with a warning instead.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let document: Value = serde_yaml::from_str(content).context("Invalid YAML syntax")?;
        let root = match document {
            Value::Mapping(mapping) => mapping,
            Value::Null => return Ok(Self::default()),
            _ => anyhow::bail!("Hook configuration must be a mapping of event names"),
        };

        let events = match root.get("hooks") {
            Some(Value::Mapping(nested)) => nested,
            _ => &root,
        };

        Ok(Self::from_event_mapping(events))
    }

    fn from_event_mapping(events: &Mapping) -> Self {
        let mut entries = BTreeMap::new();

        for event in HookEvent::ALL {
            let value = match events.get(event.as_str()) {
                None | Some(Value::Null) => continue,
                Some(value) => value.clone(),
            };

            match serde_yaml::from_value::<HookEntry>(value) {
                Ok(entry) => {
                    entries.insert(event, entry);
                }
                Err(e) => {
                    crate::log_warning!(
                        "Ignoring hook '{}': expected a command, a list of commands, or a mapping ({})",
                        event,
                        e
                    );
                }
            }
        }

        Self { entries }
    }

    #[must_use]
    pub fn get(&self, event: HookEvent) -> Option<&HookEntry> {
        self.entries.get(&event)
    }

    /// Configured events in lifecycle order
    pub fn iter(&self) -> impl Iterator<Item = (HookEvent, &HookEntry)> {
        self.entries.iter().map(|(event, entry)| (*event, entry))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
