//! Environment and working-directory resolution for hook commands.

use regex::{Captures, Regex};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

use super::HookEvent;

/// Prefix of every variable this tool exports to hooks.
pub const ENV_PREFIX: &str = "WORKTREE_";
pub const ROOT_VAR: &str = "WORKTREE_MANAGER_ROOT";
pub const MAIN_VAR: &str = "WORKTREE_MAIN";
pub const ABSOLUTE_PATH_VAR: &str = "WORKTREE_ABSOLUTE_PATH";

/// Variables copied from the parent process into the hook's explicit
/// environment.
const INHERITED_VARS: [&str; 4] = ["PATH", "HOME", "USER", "SHELL"];

#[allow(clippy::expect_used)] // literal pattern
static TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$([A-Z_][A-Z0-9_]*)").expect("valid token pattern"));

/// A scalar value carried in a [`HookContext`].
#[derive(Debug, Clone, PartialEq)]
pub enum ContextValue {
    String(String),
    Bool(bool),
    Integer(i64),
    Float(f64),
}

impl fmt::Display for ContextValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextValue::String(s) => write!(f, "{}", s),
            ContextValue::Bool(b) => write!(f, "{}", b),
            ContextValue::Integer(i) => write!(f, "{}", i),
            ContextValue::Float(x) => write!(f, "{}", x),
        }
    }
}

impl From<&str> for ContextValue {
    fn from(value: &str) -> Self {
        ContextValue::String(value.to_string())
    }
}

impl From<String> for ContextValue {
    fn from(value: String) -> Self {
        ContextValue::String(value)
    }
}

impl From<&Path> for ContextValue {
    fn from(value: &Path) -> Self {
        ContextValue::String(value.to_string_lossy().into_owned())
    }
}

impl From<bool> for ContextValue {
    fn from(value: bool) -> Self {
        ContextValue::Bool(value)
    }
}

impl From<i64> for ContextValue {
    fn from(value: i64) -> Self {
        ContextValue::Integer(value)
    }
}

impl From<f64> for ContextValue {
    fn from(value: f64) -> Self {
        ContextValue::Float(value)
    }
}

/// Key/value data describing one hook invocation (branch, path, outcome...).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HookContext {
    values: BTreeMap<String, ContextValue>,
}

impl HookContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ContextValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ContextValue>) {
        self.values.insert(key.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ContextValue> {
        self.values.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ContextValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The `path` entry rendered as a string
    #[must_use]
    pub fn path(&self) -> Option<String> {
        self.get("path").map(ToString::to_string)
    }
}

/// Resolves paths and variables relative to one repository root.
///
/// The process environment is captured once so resolution never depends on
/// ambient state that could change mid-run.
#[derive(Debug, Clone)]
pub struct HookEnvironment {
    repo_root: PathBuf,
    process_env: HashMap<String, String>,
}

impl HookEnvironment {
    #[must_use]
    pub fn new(repo_root: &Path) -> Self {
        let process_env = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect();
        Self::with_process_env(repo_root, process_env)
    }

    #[must_use]
    pub fn with_process_env(repo_root: &Path, process_env: HashMap<String, String>) -> Self {
        Self {
            repo_root: repo_root.to_path_buf(),
            process_env,
        }
    }

    #[must_use]
    pub fn repo_root(&self) -> &Path {
        &self.repo_root
    }

    /// Absolute, lexically normalized form of `path`; relative paths are
    /// taken from the repository root.
    #[must_use]
    pub fn absolute_path(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            normalize_path(path)
        } else {
            normalize_path(&self.repo_root.join(path))
        }
    }

    /// Variables set explicitly on hook commands.
    ///
    /// These are layered over the inherited process environment when the
    /// command is spawned.
    #[must_use]
    pub fn build_env_vars(&self, context: &HookContext) -> BTreeMap<String, String> {
        let mut env = BTreeMap::new();

        for name in INHERITED_VARS {
            if let Some(value) = self.process_env.get(name) {
                env.insert(name.to_string(), value.clone());
            }
        }

        let root = self.repo_root.to_string_lossy().into_owned();
        env.insert(ROOT_VAR.to_string(), root.clone());
        env.insert(MAIN_VAR.to_string(), root);

        for (key, value) in context.iter() {
            env.insert(
                format!("{}{}", ENV_PREFIX, key.to_uppercase()),
                value.to_string(),
            );
        }

        if let Some(path) = context.path() {
            env.insert(
                ABSOLUTE_PATH_VAR.to_string(),
                self.absolute_path(&path).to_string_lossy().into_owned(),
            );
        }

        env
    }

    /// Where a hook runs when its entry has no `pwd`.
    ///
    /// `post_add` and `pre_remove` run inside the affected worktree; every
    /// other event, or a context without `path`, runs in the repository root.
    #[must_use]
    pub fn default_working_directory(&self, event: HookEvent, context: &HookContext) -> PathBuf {
        match (event, context.path()) {
            (HookEvent::PostAdd | HookEvent::PreRemove, Some(path)) => self.absolute_path(&path),
            _ => self.repo_root.clone(),
        }
    }

    /// Replaces `$NAME` tokens. Unknown tokens are left as written.
    #[must_use]
    pub fn substitute_variables(&self, input: &str, context: &HookContext) -> String {
        TOKEN_PATTERN
            .replace_all(input, |caps: &Captures<'_>| {
                self.resolve_token(&caps[1], context)
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }

    fn resolve_token(&self, name: &str, context: &HookContext) -> Option<String> {
        if name == ABSOLUTE_PATH_VAR {
            if let Some(path) = context.path() {
                return Some(self.absolute_path(&path).to_string_lossy().into_owned());
            }
        }

        if name == ROOT_VAR || name == MAIN_VAR {
            return Some(self.repo_root.to_string_lossy().into_owned());
        }

        if let Some(key) = name.strip_prefix(ENV_PREFIX) {
            return context.get(&key.to_lowercase()).map(ToString::to_string);
        }

        self.process_env.get(name).cloned()
    }

    /// Resolves a `pwd` override: substitution first, then relative results
    /// are anchored at the repository root.
    #[must_use]
    pub fn resolve_working_directory(&self, pwd: &str, context: &HookContext) -> PathBuf {
        let substituted = self.substitute_variables(pwd, context);
        self.absolute_path(&substituted)
    }
}

/// Removes `.` and `..` components without touching the filesystem.
pub(crate) fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn environment() -> HookEnvironment {
        let process_env = HashMap::from([
            ("PATH".to_string(), "/usr/bin:/bin".to_string()),
            ("HOME".to_string(), "/home/dev".to_string()),
            ("EDITOR".to_string(), "vim".to_string()),
        ]);
        HookEnvironment::with_process_env(Path::new("/repos/app"), process_env)
    }

    #[test]
    fn test_context_value_display() {
        assert_eq!(ContextValue::from("x").to_string(), "x");
        assert_eq!(ContextValue::from(true).to_string(), "true");
        assert_eq!(ContextValue::from(false).to_string(), "false");
        assert_eq!(ContextValue::from(42_i64).to_string(), "42");
        assert_eq!(ContextValue::from(1.5_f64).to_string(), "1.5");
    }

    #[test]
    fn test_build_env_vars() {
        let context = HookContext::new()
            .with("branch", "feature/auth")
            .with("path", "../app-feature")
            .with("force", false);
        let env = environment().build_env_vars(&context);

        assert_eq!(env["PATH"], "/usr/bin:/bin");
        assert_eq!(env["HOME"], "/home/dev");
        assert!(!env.contains_key("USER"));
        assert!(!env.contains_key("SHELL"));
        assert!(!env.contains_key("EDITOR"));

        assert_eq!(env[ROOT_VAR], "/repos/app");
        assert_eq!(env[MAIN_VAR], "/repos/app");
        assert_eq!(env["WORKTREE_BRANCH"], "feature/auth");
        assert_eq!(env["WORKTREE_PATH"], "../app-feature");
        assert_eq!(env["WORKTREE_FORCE"], "false");
        assert_eq!(env[ABSOLUTE_PATH_VAR], "/repos/app-feature");
    }

    #[test]
    fn test_absolute_path_var_only_with_path() {
        let env = environment().build_env_vars(&HookContext::new().with("branch", "x"));
        assert!(!env.contains_key(ABSOLUTE_PATH_VAR));
    }

    #[test]
    fn test_absolute_path_keeps_absolute_input() {
        let env = environment();
        assert_eq!(env.absolute_path("/tmp/w"), PathBuf::from("/tmp/w"));
        assert_eq!(env.absolute_path("/tmp/./a/../w"), PathBuf::from("/tmp/w"));
        assert_eq!(env.absolute_path("w"), PathBuf::from("/repos/app/w"));
    }

    #[test]
    fn test_default_working_directory() {
        let env = environment();
        let context = HookContext::new().with("path", "/work/feature");

        assert_eq!(
            env.default_working_directory(HookEvent::PostAdd, &context),
            PathBuf::from("/work/feature")
        );
        assert_eq!(
            env.default_working_directory(HookEvent::PreRemove, &context),
            PathBuf::from("/work/feature")
        );
        assert_eq!(
            env.default_working_directory(HookEvent::PreAdd, &context),
            PathBuf::from("/repos/app")
        );
        assert_eq!(
            env.default_working_directory(HookEvent::PostRemove, &context),
            PathBuf::from("/repos/app")
        );
        assert_eq!(
            env.default_working_directory(HookEvent::PostAdd, &HookContext::new()),
            PathBuf::from("/repos/app")
        );
    }

    #[test]
    fn test_substitution_priority() {
        let env = environment();
        let context = HookContext::new()
            .with("path", "../w")
            .with("branch", "topic");

        assert_eq!(
            env.substitute_variables("$WORKTREE_ABSOLUTE_PATH", &context),
            "/repos/w"
        );
        assert_eq!(
            env.substitute_variables("$WORKTREE_MANAGER_ROOT/sub", &context),
            "/repos/app/sub"
        );
        assert_eq!(env.substitute_variables("$WORKTREE_MAIN", &context), "/repos/app");
        assert_eq!(
            env.substitute_variables("/tmp/$WORKTREE_BRANCH", &context),
            "/tmp/topic"
        );
        assert_eq!(env.substitute_variables("$HOME/x", &context), "/home/dev/x");
    }

    #[test]
    fn test_substitution_misses_keep_literal_token() {
        let env = environment();
        let context = HookContext::new();

        assert_eq!(env.substitute_variables("$WORKTREE_NOPE/x", &context), "$WORKTREE_NOPE/x");
        assert_eq!(env.substitute_variables("$UNSET_VAR", &context), "$UNSET_VAR");
        // without a path the absolute-path token falls through to a context lookup
        assert_eq!(
            env.substitute_variables("$WORKTREE_ABSOLUTE_PATH", &context),
            "$WORKTREE_ABSOLUTE_PATH"
        );
        // lowercase names are not tokens
        assert_eq!(env.substitute_variables("$home", &context), "$home");
    }

    #[test]
    fn test_resolve_working_directory() {
        let env = environment();
        let context = HookContext::new().with("path", "../w");

        assert_eq!(
            env.resolve_working_directory("$WORKTREE_ABSOLUTE_PATH", &context),
            PathBuf::from("/repos/w")
        );
        assert_eq!(
            env.resolve_working_directory("scripts", &context),
            PathBuf::from("/repos/app/scripts")
        );
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(Path::new("/a/b/../c/./d")), PathBuf::from("/a/c/d"));
        assert_eq!(normalize_path(Path::new("/..")), PathBuf::from("/"));
    }
}
